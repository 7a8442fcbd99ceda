use crate::{
    core::{
        config::{BaseLayerConfig, TileConfig},
        constants::{MAX_ZOOM, TILE_SIZE},
        geo::TileCoord,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    tiles::source::{MapboxStyleSource, OpenStreetMapSource, TileSource},
    Result,
};
use log::warn;
use serde::{Deserialize, Serialize};

/// Configuration for a tile layer, serialized as Leaflet tile layer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerOptions {
    /// Tile size in pixels
    pub tile_size: u32,
    /// Minimum zoom level for this tile source
    pub min_zoom: u8,
    /// Maximum zoom level for this tile source
    pub max_zoom: u8,
    /// Added to the map zoom when requesting tiles
    pub zoom_offset: i32,
    /// Attribution text
    pub attribution: String,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            min_zoom: 0,
            max_zoom: MAX_ZOOM,
            zoom_offset: 0,
            attribution: String::new(),
        }
    }
}

/// A base map layer backed by a tile server
pub struct TileLayer {
    properties: LayerProperties,
    options: TileLayerOptions,
    source: Box<dyn TileSource>,
}

impl std::fmt::Debug for TileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLayer")
            .field("properties", &self.properties)
            .field("options", &self.options)
            .field("url_template", &self.source.url_template())
            .finish()
    }
}

impl TileLayer {
    pub const OSM_NAME: &'static str = "OpenStreetMap";

    pub fn new(name: impl Into<String>, source: Box<dyn TileSource>, options: TileLayerOptions) -> Self {
        let name = name.into();
        let id = format!("tiles-{}", name.to_lowercase().replace(' ', "-"));
        let options = TileLayerOptions {
            attribution: source.attribution().to_string(),
            ..options
        };
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            options,
            source,
        }
    }

    /// A Mapbox style layer with the tile geometry from `config`
    pub fn mapbox(config: &BaseLayerConfig, access_token: &str) -> Self {
        let source = MapboxStyleSource::new(config.style.clone(), access_token);
        let options = TileLayerOptions {
            tile_size: config.tile_size,
            max_zoom: config.max_zoom,
            zoom_offset: config.zoom_offset,
            ..TileLayerOptions::default()
        };
        Self::new(config.name.clone(), Box::new(source), options)
    }

    /// Standard OpenStreetMap tiles under the given layer name
    pub fn openstreetmap(name: impl Into<String>) -> Self {
        Self::new(
            name,
            Box::new(OpenStreetMapSource::new()),
            TileLayerOptions::default(),
        )
    }

    /// The configured Mapbox base layers when a token is available, a
    /// single OpenStreetMap layer otherwise
    pub fn base_layers(config: &TileConfig) -> Vec<Self> {
        match config.access_token.as_deref() {
            Some(token) if !token.is_empty() => config
                .base_layers
                .iter()
                .map(|layer| Self::mapbox(layer, token))
                .collect(),
            _ => {
                warn!("no Mapbox access token configured, using OpenStreetMap tiles");
                vec![Self::openstreetmap(Self::OSM_NAME)]
            }
        }
    }

    pub fn tile_options(&self) -> &TileLayerOptions {
        &self.options
    }

    pub fn url_template(&self) -> String {
        self.source.url_template()
    }

    pub fn subdomains(&self) -> Vec<String> {
        self.source.subdomains()
    }

    /// URL of one tile, with the zoom offset applied
    pub fn tile_url(&self, coord: TileCoord) -> String {
        let z = (coord.z as i32 + self.options.zoom_offset).clamp(0, u8::MAX as i32) as u8;
        self.source.url(TileCoord::new(coord.x, coord.y, z))
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn options(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(&self.options).unwrap_or(serde_json::Value::Null);
        let subdomains = self.source.subdomains();
        if let (Some(map), false) = (value.as_object_mut(), subdomains.is_empty()) {
            map.insert("subdomains".to_string(), serde_json::json!(subdomains));
        }
        value
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        self.options = serde_json::from_value(options)?;
        Ok(())
    }
}
