//! Prelude module for common quakemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use quakemap::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::{
        EncodingOptions, FetchConfig, FetchProfile, QuakeMapConfig, SourceConfig, TileConfig,
        ViewConfig,
    },
    geo::{LatLng, LatLngBounds, TileCoord},
    map::{QuakeMap, SourceReport, SourceStatus},
    session::MapSession,
};

pub use crate::data::{
    earthquake::{EarthquakeFeature, FeatureError},
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    loader::FeedLoader,
    source::{GeoJsonSource, HttpSource, StaticSource},
};

pub use crate::encoding::{
    depth::{classify_depth, depth_bin, DepthBin, DepthColor, DEPTH_THRESHOLDS_KM},
    feature::{
        encode_collection, encode_feature, EncodedCollection, EncodedFeature, MarkerStyle,
        SkippedFeature,
    },
    magnitude::scale_magnitude,
};

pub use crate::layers::{
    base::{LayerProperties, LayerTrait, LayerType},
    marker::{CircleMarker, EarthquakeLayer},
    tile::{TileLayer, TileLayerOptions},
    vector::{LineStyle, PlateBoundaryLayer},
};

pub use crate::tiles::source::{MapboxStyleSource, OpenStreetMapSource, TileSource};

pub use crate::traits::RetryPolicy;

pub use crate::ui::{
    controls::{ControlPosition, LayerControl},
    legend::{build_legend, Legend, LegendEntry},
    popup::PopupContent,
};

pub use crate::rendering::html::HtmlRenderer;

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};
