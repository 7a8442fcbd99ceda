use crate::{
    core::{config::EncodingOptions, constants},
    data::{
        earthquake::{EarthquakeFeature, FeatureError},
        geojson::GeoJson,
    },
    encoding::{depth::classify_depth, depth::DepthColor, magnitude::scale_magnitude},
    ui::popup::PopupContent,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Circle style, serialized with the option names of Leaflet's `L.circle`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    /// Meters on the ground, not screen pixels
    pub radius: f64,
    pub fill_color: DepthColor,
    pub fill_opacity: f64,
    #[serde(rename = "color")]
    pub stroke_color: String,
    pub stroke: bool,
    #[serde(rename = "weight")]
    pub stroke_weight: f64,
}

impl MarkerStyle {
    pub fn new(radius: f64, fill_color: DepthColor) -> Self {
        Self {
            radius,
            fill_color,
            fill_opacity: constants::MARKER_FILL_OPACITY,
            stroke_color: constants::MARKER_STROKE_COLOR.to_string(),
            stroke: true,
            stroke_weight: constants::MARKER_STROKE_WEIGHT,
        }
    }
}

/// Style and popup for one earthquake
pub fn encode_feature(feature: &EarthquakeFeature) -> (MarkerStyle, PopupContent) {
    encode_feature_with(feature, &EncodingOptions { min_radius_m: None })
}

/// [`encode_feature`] with a radius floor applied when configured
pub fn encode_feature_with(
    feature: &EarthquakeFeature,
    options: &EncodingOptions,
) -> (MarkerStyle, PopupContent) {
    let mut radius = scale_magnitude(feature.magnitude);
    if let Some(floor) = options.min_radius_m {
        radius = radius.max(floor);
    }
    let style = MarkerStyle::new(radius, classify_depth(feature.depth_km));
    (style, PopupContent::for_feature(feature))
}

/// An earthquake with its derived style and popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeature {
    pub feature: EarthquakeFeature,
    pub style: MarkerStyle,
    pub popup: PopupContent,
}

/// A feed feature that could not be encoded
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFeature {
    /// Position in the input collection
    pub index: usize,
    pub id: Option<String>,
    pub reason: FeatureError,
}

/// Result of encoding a whole feed: encoded features in input order plus
/// whatever had to be skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedCollection {
    pub features: Vec<EncodedFeature>,
    pub skipped: Vec<SkippedFeature>,
}

impl EncodedCollection {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Encode every feature of the earthquake feed.
///
/// Malformed features are skipped and reported, never fatal. Output order
/// follows input order.
pub fn encode_collection(geojson: &GeoJson, options: &EncodingOptions) -> EncodedCollection {
    let mut encoded = EncodedCollection::default();

    for (index, raw) in geojson.features().iter().enumerate() {
        match EarthquakeFeature::try_from(raw) {
            Ok(feature) => {
                let (style, popup) = encode_feature_with(&feature, options);
                encoded.features.push(EncodedFeature {
                    feature,
                    style,
                    popup,
                });
            }
            Err(reason) => {
                let id = raw.id_string();
                debug!("skipping feature {} ({:?}): {}", index, id, reason);
                encoded.skipped.push(SkippedFeature { index, id, reason });
            }
        }
    }

    if !encoded.skipped.is_empty() {
        warn!(
            "skipped {} of {} earthquake features",
            encoded.skipped.len(),
            geojson.len()
        );
    }
    encoded
}
