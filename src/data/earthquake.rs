//! Earthquake records extracted from the USGS GeoJSON feed

use crate::{
    core::geo::LatLng,
    data::geojson::{GeoJsonFeature, GeoJsonGeometry},
};
use serde::{Deserialize, Serialize};

/// One earthquake, as read from a feed feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeFeature {
    pub id: Option<String>,
    pub place: String,
    /// Origin time, milliseconds since the Unix epoch. Features without
    /// one are still drawn; the popup date reads `Invalid Date`.
    pub time: Option<i64>,
    pub magnitude: f64,
    pub depth_km: f64,
    pub longitude: f64,
    pub latitude: f64,
}

/// Why a feed feature could not become an [`EarthquakeFeature`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error("malformed feature: {0}")]
    Malformed(String),

    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("geometry is not a point with longitude and latitude")]
    NotAPoint,

    #[error("point has no depth coordinate")]
    MissingDepth,

    #[error("property `{0}` is missing or null")]
    MissingProperty(&'static str),

    #[error("property `{0}` has the wrong type")]
    InvalidProperty(&'static str),
}

impl EarthquakeFeature {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

impl TryFrom<&GeoJsonFeature> for EarthquakeFeature {
    type Error = FeatureError;

    fn try_from(feature: &GeoJsonFeature) -> Result<Self, Self::Error> {
        if let Some(reason) = &feature.malformed {
            return Err(FeatureError::Malformed(reason.clone()));
        }
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or(FeatureError::MissingGeometry)?;
        if !matches!(geometry, GeoJsonGeometry::Point { .. }) {
            return Err(FeatureError::NotAPoint);
        }
        let (position, depth) = geometry
            .point_position()
            .ok_or(FeatureError::NotAPoint)?;
        let depth_km = depth.ok_or(FeatureError::MissingDepth)?;

        let place = feature
            .property("place")
            .ok_or(FeatureError::MissingProperty("place"))?
            .as_str()
            .ok_or(FeatureError::InvalidProperty("place"))?
            .to_string();

        let magnitude = feature
            .property("mag")
            .ok_or(FeatureError::MissingProperty("mag"))?
            .as_f64()
            .ok_or(FeatureError::InvalidProperty("mag"))?;

        // Epoch millis are integral, but some mirrors emit them as floats
        let time = feature
            .property("time")
            .map(|value| {
                value
                    .as_i64()
                    .or_else(|| value.as_f64().map(|t| t as i64))
                    .ok_or(FeatureError::InvalidProperty("time"))
            })
            .transpose()?;

        Ok(Self {
            id: feature.id_string(),
            place,
            time,
            magnitude,
            depth_km,
            longitude: position.lng,
            latitude: position.lat,
        })
    }
}
