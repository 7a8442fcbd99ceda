//! Configuration for data sources, fetching, the initial view, base layers
//! and marker encoding
//!
//! Everything has a default matching the stock earthquake map, so an empty
//! JSON object is a complete configuration. Fetch behavior is chosen through
//! presets that resolve to a concrete [`FetchConfig`].

use crate::{
    core::{constants, geo::LatLng},
    traits::RetryPolicy,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuakeMapConfig {
    /// Page title of rendered documents
    pub title: String,
    pub sources: SourceConfig,
    pub fetch: FetchProfile,
    pub view: ViewConfig,
    pub tiles: TileConfig,
    pub encoding: EncodingOptions,
}

impl Default for QuakeMapConfig {
    fn default() -> Self {
        Self {
            title: "Earthquakes of the Past Week".to_string(),
            sources: SourceConfig::default(),
            fetch: FetchProfile::default(),
            view: ViewConfig::default(),
            tiles: TileConfig::default(),
            encoding: EncodingOptions::default(),
        }
    }
}

impl QuakeMapConfig {
    /// Parses a JSON configuration; missing fields take their defaults
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.earthquakes_url.trim().is_empty() {
            return Err(MapError::Config("earthquake feed URL is empty".into()));
        }
        if self.sources.plates_url.trim().is_empty() {
            return Err(MapError::Config("plate boundary URL is empty".into()));
        }
        if !self.view.center.is_valid() {
            return Err(MapError::Config(format!(
                "view center {:?} is outside the valid coordinate range",
                self.view.center
            )));
        }
        if !(0.0..=f64::from(constants::MAX_ZOOM)).contains(&self.view.zoom) {
            return Err(MapError::Config(format!(
                "zoom {} outside 0..={}",
                self.view.zoom,
                constants::MAX_ZOOM
            )));
        }
        if self.tiles.base_layers.is_empty() {
            return Err(MapError::Config("at least one base layer is required".into()));
        }
        if let Some(floor) = self.encoding.min_radius_m {
            if !(floor.is_finite() && floor > 0.0) {
                return Err(MapError::Config(format!(
                    "minimum marker radius must be positive, got {floor}"
                )));
            }
        }
        let fetch = self.fetch.resolve();
        if fetch.timeout_ms == 0 {
            return Err(MapError::Config("fetch timeout must be non-zero".into()));
        }
        Ok(())
    }
}

/// Where the two collections come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub earthquakes_url: String,
    pub plates_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            earthquakes_url: constants::EARTHQUAKE_FEED_URL.to_string(),
            plates_url: constants::PLATE_BOUNDARIES_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FetchProfile {
    Balanced,
    Patient,
    FailFast,
    Custom(FetchConfig),
}

impl FetchProfile {
    pub fn resolve(&self) -> FetchConfig {
        match self {
            Self::Balanced => FetchConfig::default(),
            Self::Patient => FetchConfig {
                max_retries: 5,
                retry_delay_ms: 1000,
                exponential_backoff: true,
                timeout_ms: 30_000,
                ..FetchConfig::default()
            },
            Self::FailFast => FetchConfig {
                max_retries: 0,
                retry_delay_ms: 0,
                exponential_backoff: false,
                timeout_ms: 5_000,
                ..FetchConfig::default()
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for FetchProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

/// Retry and timeout settings applied to each feed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub exponential_backoff: bool,
    /// Per-attempt timeout
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Total attempts made before a source is given up on
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 500,
            exponential_backoff: true,
            timeout_ms: 15_000,
            user_agent: constants::USER_AGENT.to_string(),
        }
    }
}

impl RetryPolicy for FetchConfig {
    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    fn exponential_backoff(&self) -> bool {
        self.exponential_backoff
    }
}

/// Initial view of the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    /// Fit the view to the loaded earthquakes instead of `center`/`zoom`
    pub fit_bounds: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::from(constants::DEFAULT_CENTER),
            zoom: constants::DEFAULT_ZOOM,
            fit_bounds: false,
        }
    }
}

/// Base layer definitions and the opaque tile provider credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// Mapbox access token. Without one the map falls back to OpenStreetMap.
    pub access_token: Option<String>,
    pub base_layers: Vec<BaseLayerConfig>,
    /// Name of the base layer shown first; defaults to the first one
    pub active_base: Option<String>,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_layers: vec![
                BaseLayerConfig::mapbox("Grayscale", "mapbox/light-v11"),
                BaseLayerConfig::mapbox("Satellite", "mapbox/satellite-streets-v12"),
                BaseLayerConfig::mapbox("Outdoors", "mapbox/outdoors-v12"),
            ],
            active_base: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayerConfig {
    pub name: String,
    /// Mapbox style id, e.g. `mapbox/light-v11`
    pub style: String,
    #[serde(default = "default_mapbox_tile_size")]
    pub tile_size: u32,
    #[serde(default = "default_mapbox_zoom_offset")]
    pub zoom_offset: i32,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
}

impl BaseLayerConfig {
    pub fn mapbox(name: &str, style: &str) -> Self {
        Self {
            name: name.to_string(),
            style: style.to_string(),
            tile_size: constants::MAPBOX_TILE_SIZE,
            zoom_offset: constants::MAPBOX_ZOOM_OFFSET,
            max_zoom: constants::MAX_ZOOM,
        }
    }
}

fn default_mapbox_tile_size() -> u32 {
    constants::MAPBOX_TILE_SIZE
}

fn default_mapbox_zoom_offset() -> i32 {
    constants::MAPBOX_ZOOM_OFFSET
}

fn default_max_zoom() -> u8 {
    constants::MAX_ZOOM
}

/// Marker encoding knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingOptions {
    /// Floor for marker radii in meters. `None` hands the scaled radius
    /// through untouched, even when it is zero or negative.
    pub min_radius_m: Option<f64>,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            min_radius_m: Some(constants::MIN_MARKER_RADIUS_M),
        }
    }
}
