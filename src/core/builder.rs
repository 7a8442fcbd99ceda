//! Map builder for fluent API configuration
//!
//! Collects configuration, fetch behavior and the two data sources, then
//! produces a [`MapSession`] (or a single assembled [`QuakeMap`]).

use crate::{
    core::{
        config::{FetchConfig, FetchProfile, QuakeMapConfig},
        geo::LatLng,
        map::QuakeMap,
        session::MapSession,
    },
    data::source::{GeoJsonSource, HttpSource},
    layers::{marker::EarthquakeLayer, vector::PlateBoundaryLayer},
    Result,
};

/// Builder for creating and configuring map sessions
pub struct MapBuilder {
    config: QuakeMapConfig,
    /// Overrides the HTTP earthquake feed
    earthquake_source: Option<Box<dyn GeoJsonSource>>,
    /// Overrides the HTTP plate boundary feed
    plate_source: Option<Box<dyn GeoJsonSource>>,
}

impl MapBuilder {
    /// Create a new MapBuilder with default settings
    pub fn new() -> Self {
        Self {
            config: QuakeMapConfig::default(),
            earthquake_source: None,
            plate_source: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: QuakeMapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Set the initial center and zoom level
    pub fn with_center_and_zoom(mut self, center: LatLng, zoom: f64) -> Self {
        self.config.view.center = center;
        self.config.view.zoom = zoom;
        self
    }

    /// Fit the initial view to the loaded earthquakes
    pub fn with_fit_bounds(mut self, enabled: bool) -> Self {
        self.config.view.fit_bounds = enabled;
        self
    }

    /// Set the fetch profile
    pub fn with_fetch_profile(mut self, profile: FetchProfile) -> Self {
        self.config.fetch = profile;
        self
    }

    /// Set custom fetch options
    pub fn with_fetch_config(mut self, config: FetchConfig) -> Self {
        self.config.fetch = FetchProfile::Custom(config);
        self
    }

    /// Configure retry behavior on top of the current profile
    pub fn with_retries(mut self, max_retries: u32, delay_ms: u64, exponential_backoff: bool) -> Self {
        let mut config = self.config.fetch.resolve();
        config.max_retries = max_retries;
        config.retry_delay_ms = delay_ms;
        config.exponential_backoff = exponential_backoff;
        self.config.fetch = FetchProfile::Custom(config);
        self
    }

    /// Set the tile provider access token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.config.tiles.access_token = Some(token.into());
        self
    }

    pub fn with_active_base(mut self, name: impl Into<String>) -> Self {
        self.config.tiles.active_base = Some(name.into());
        self
    }

    /// Feed earthquakes from `source` instead of the configured URL
    pub fn with_earthquake_source(mut self, source: Box<dyn GeoJsonSource>) -> Self {
        self.earthquake_source = Some(source);
        self
    }

    /// Feed plate boundaries from `source` instead of the configured URL
    pub fn with_plate_source(mut self, source: Box<dyn GeoJsonSource>) -> Self {
        self.plate_source = Some(source);
        self
    }

    pub fn config(&self) -> &QuakeMapConfig {
        &self.config
    }

    /// Build a session with the configured options
    pub fn build(self) -> Result<MapSession> {
        self.config.validate()?;
        let user_agent = self.config.fetch.resolve().user_agent;

        let earthquake_source: Box<dyn GeoJsonSource> = match self.earthquake_source {
            Some(source) => source,
            None => Box::new(HttpSource::with_user_agent(
                EarthquakeLayer::NAME,
                self.config.sources.earthquakes_url.clone(),
                &user_agent,
            )?),
        };
        let plate_source: Box<dyn GeoJsonSource> = match self.plate_source {
            Some(source) => source,
            None => Box::new(HttpSource::with_user_agent(
                PlateBoundaryLayer::NAME,
                self.config.sources.plates_url.clone(),
                &user_agent,
            )?),
        };

        Ok(MapSession::new(self.config, earthquake_source, plate_source))
    }

    /// Build, fetch once, and return the assembled map
    pub async fn assemble(self) -> Result<QuakeMap> {
        self.build()?.refresh().await
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
