//! # quakemap
//!
//! Earthquake and tectonic-plate map assembly, in the spirit of a Leaflet
//! page but with the data-to-visual encoding written as plain Rust.
//!
//! The crate fetches two GeoJSON collections (the earthquake feed and the
//! plate-boundary dataset), encodes every earthquake as a geographic circle
//! whose radius follows magnitude and whose color follows depth, derives the
//! depth legend from the same thresholds, and assembles everything with base
//! layers and a layer control into a [`QuakeMap`]. The map can then be
//! rendered to a standalone HTML document.

pub mod core;
pub mod data;
pub mod encoding;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod tiles;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapBuilder,
    config::{FetchConfig, FetchProfile, QuakeMapConfig},
    geo::{LatLng, LatLngBounds, TileCoord},
    map::{QuakeMap, SourceReport, SourceStatus},
    session::MapSession,
};

pub use data::{
    earthquake::{EarthquakeFeature, FeatureError},
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    loader::FeedLoader,
    source::{GeoJsonSource, HttpSource, StaticSource},
};

pub use encoding::{
    depth::{classify_depth, DepthBin, DepthColor},
    feature::{encode_collection, encode_feature, EncodedCollection, MarkerStyle},
    magnitude::scale_magnitude,
};

pub use layers::{
    base::LayerTrait, marker::EarthquakeLayer, tile::TileLayer, vector::PlateBoundaryLayer,
};

pub use ui::{
    controls::{ControlPosition, LayerControl},
    legend::{build_legend, Legend, LegendEntry},
    popup::PopupContent,
};

pub use rendering::html::HtmlRenderer;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("{origin} did not answer within {timeout_ms} ms")]
    Timeout { origin: String, timeout_ms: u64 },

    #[error("Invalid GeoJSON from {origin}: {reason}")]
    InvalidGeoJson { origin: String, reason: String },

    #[error("{origin} unavailable after {attempts} attempt(s): {last_error}")]
    FetchExhausted {
        origin: String,
        attempts: u32,
        last_error: Box<MapError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layer error: {0}")]
    Layer(String),
}

impl MapError {
    /// Whether another attempt at the same request could succeed.
    ///
    /// Connection problems, timeouts and 5xx/429 answers are transient.
    /// Client errors and payloads that do not parse are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            MapError::Network(_) | MapError::Timeout { .. } | MapError::Io(_) => true,
            MapError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Error type alias for convenience
pub type Error = MapError;
