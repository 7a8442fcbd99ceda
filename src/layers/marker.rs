use crate::{
    core::geo::{LatLng, LatLngBounds},
    encoding::feature::{EncodedCollection, EncodedFeature, MarkerStyle},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    ui::popup::PopupContent,
};
use serde::Serialize;

/// A geographic circle with a popup, one per earthquake
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub position: LatLng,
    pub style: MarkerStyle,
    #[serde(skip)]
    pub popup: PopupContent,
}

impl CircleMarker {
    pub fn new(position: LatLng, style: MarkerStyle, popup: PopupContent) -> Self {
        Self {
            position,
            style,
            popup,
        }
    }

    /// Position, style, and popup markup as consumed by the page script
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "latlng": [self.position.lat, self.position.lng],
            "style": self.style,
            "popup": self.popup.to_html(),
        })
    }
}

impl From<&EncodedFeature> for CircleMarker {
    fn from(encoded: &EncodedFeature) -> Self {
        Self::new(
            encoded.feature.position(),
            encoded.style.clone(),
            encoded.popup.clone(),
        )
    }
}

/// The "Earthquakes" overlay
#[derive(Debug, Clone)]
pub struct EarthquakeLayer {
    properties: LayerProperties,
    markers: Vec<CircleMarker>,
    skipped: usize,
}

impl EarthquakeLayer {
    pub const NAME: &'static str = "Earthquakes";

    /// An overlay with no markers
    pub fn empty() -> Self {
        Self {
            properties: LayerProperties::new("earthquakes", Self::NAME, LayerType::Circle)
                .with_z_index(2),
            markers: Vec::new(),
            skipped: 0,
        }
    }

    /// One marker per encoded feature, in feed order
    pub fn from_encoded(encoded: &EncodedCollection) -> Self {
        let mut layer = Self::empty();
        layer.markers = encoded.features.iter().map(CircleMarker::from).collect();
        layer.skipped = encoded.skipped_count();
        layer
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Number of feed features that could not be drawn
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn markers_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.markers.iter().map(CircleMarker::to_json).collect())
    }
}

impl LayerTrait for EarthquakeLayer {
    crate::impl_layer_trait!(EarthquakeLayer, properties);
    crate::impl_readonly_options!(EarthquakeLayer);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.properties.name,
            "markers": self.markers.len(),
            "skipped": self.skipped,
        })
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.markers.iter().map(|m| m.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::config::EncodingOptions,
        data::geojson::GeoJson,
        encoding::{depth::DepthColor, feature::encode_collection},
    };

    fn collection() -> EncodedCollection {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "a", "properties": {"place": "Off the coast of Oregon", "time": 1700000000000, "mag": 4.4}, "geometry": {"type": "Point", "coordinates": [-127.1, 43.6, 10.0]}},
                {"type": "Feature", "id": "b", "properties": {"place": "Fiji region", "time": 1700000000000, "mag": 5.1}, "geometry": {"type": "Point", "coordinates": [178.2, -17.9, 560.3]}},
                {"type": "Feature", "id": "c", "properties": {"time": 1700000000000, "mag": 1.2}, "geometry": {"type": "Point", "coordinates": [0.0, 0.0, 1.0]}}
            ]
        }"#;
        encode_collection(
            &GeoJson::parse(raw, "test").unwrap(),
            &EncodingOptions::default(),
        )
    }

    #[test]
    fn test_layer_from_encoded() {
        let layer = EarthquakeLayer::from_encoded(&collection());
        assert_eq!(layer.name(), "Earthquakes");
        assert_eq!(layer.layer_type(), LayerType::Circle);
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.skipped(), 1);
        assert_eq!(layer.markers()[0].style.fill_color, DepthColor::GreenYellow);
        assert_eq!(layer.markers()[1].style.fill_color, DepthColor::Red);
    }

    #[test]
    fn test_bounds_cover_markers() {
        let layer = EarthquakeLayer::from_encoded(&collection());
        let bounds = layer.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-17.9, -127.1));
        assert_eq!(bounds.north_east, LatLng::new(43.6, 178.2));
        assert!(EarthquakeLayer::empty().bounds().is_none());
    }

    #[test]
    fn test_marker_json() {
        let layer = EarthquakeLayer::from_encoded(&collection());
        let json = layer.markers_json();
        assert_eq!(json[0]["latlng"][0], 43.6);
        assert_eq!(json[0]["style"]["fillColor"], "greenyellow");
        assert!(json[0]["popup"]
            .as_str()
            .unwrap()
            .starts_with("<h3>Location: Off the coast of Oregon</h3>"));
    }

    #[test]
    fn test_options_are_readonly() {
        let mut layer = EarthquakeLayer::empty();
        assert!(layer.set_options(serde_json::json!({})).is_err());
        layer.set_visible(false);
        assert!(!layer.is_visible());
        layer.set_opacity(3.0);
        assert_eq!(layer.opacity(), 1.0);
    }
}
