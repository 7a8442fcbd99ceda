use crate::{
    core::{
        constants::{PLATE_STROKE_COLOR, PLATE_STROKE_WEIGHT},
        geo::LatLngBounds,
    },
    data::geojson::{GeoJson, GeoJsonGeometry},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    Result,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Style for line features, named after Leaflet's path options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// CSS stroke color
    pub color: String,
    /// Stroke width in pixels
    pub weight: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: PLATE_STROKE_COLOR.to_string(),
            weight: PLATE_STROKE_WEIGHT,
        }
    }
}

/// The "Tectonic Plates" overlay: boundary geometries drawn as styled lines
#[derive(Debug, Clone)]
pub struct PlateBoundaryLayer {
    properties: LayerProperties,
    geometries: Vec<GeoJsonGeometry>,
    style: LineStyle,
    skipped: usize,
}

impl PlateBoundaryLayer {
    pub const NAME: &'static str = "Tectonic Plates";

    /// Keeps every feature geometry of the boundaries document. Features
    /// without a usable geometry have nothing to draw and are counted as
    /// skipped.
    pub fn from_geojson(geojson: &GeoJson) -> Self {
        let geometries: Vec<GeoJsonGeometry> = geojson
            .features()
            .iter()
            .filter_map(|f| f.geometry.clone())
            .collect();

        let skipped = geojson.len() - geometries.len();
        if skipped > 0 {
            warn!("skipped {} of {} plate boundary features", skipped, geojson.len());
        }

        let non_linear = geometries.iter().filter(|g| !g.is_linear()).count();
        if non_linear > 0 {
            debug!("{} plate boundary geometries are not lines", non_linear);
        }

        Self {
            properties: LayerProperties::new("plates", Self::NAME, LayerType::Vector)
                .with_z_index(1),
            geometries,
            style: LineStyle::default(),
            skipped,
        }
    }

    pub fn geometries(&self) -> &[GeoJsonGeometry] {
        &self.geometries
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Features of the source document that had nothing drawable
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The geometries wrapped as a GeoJSON FeatureCollection
    pub fn features_json(&self) -> serde_json::Value {
        let features: Vec<serde_json::Value> = self
            .geometries
            .iter()
            .map(|geometry| {
                serde_json::json!({
                    "type": "Feature",
                    "properties": {},
                    "geometry": geometry,
                })
            })
            .collect();
        serde_json::json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

impl LayerTrait for PlateBoundaryLayer {
    crate::impl_layer_trait!(PlateBoundaryLayer, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(&self.style).unwrap_or(serde_json::Value::Null)
    }

    /// Accepts a partial `{color, weight}` object
    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        let mut merged = serde_json::to_value(&self.style)?;
        if let (Some(target), Some(source)) = (merged.as_object_mut(), options.as_object()) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        }
        self.style = serde_json::from_value(merged)?;
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.geometries
            .iter()
            .filter_map(GeoJsonGeometry::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}
