//! Data-to-visual encoding
//!
//! Depth becomes a color, magnitude becomes a radius, and an earthquake
//! record becomes a styled circle with a popup. Everything here is a pure
//! function of its input.

pub mod depth;
pub mod feature;
pub mod magnitude;

pub use depth::{classify_depth, depth_bin, DepthBin, DepthColor, DEPTH_THRESHOLDS_KM};
pub use feature::{encode_collection, encode_feature, EncodedCollection, MarkerStyle};
pub use magnitude::scale_magnitude;
