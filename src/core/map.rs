use crate::{
    core::{
        config::QuakeMapConfig,
        geo::{LatLng, LatLngBounds},
    },
    layers::{
        base::LayerTrait, marker::EarthquakeLayer, tile::TileLayer, vector::PlateBoundaryLayer,
    },
    ui::{controls::LayerControl, legend::Legend},
    MapError, Result,
};
use log::warn;
use serde::{Deserialize, Serialize};

/// Outcome of loading one data source for the current map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceStatus {
    /// Fetched and decoded on this refresh
    Loaded { features: usize, skipped: usize },
    /// This refresh failed; an earlier snapshot is shown instead
    Stale { features: usize, error: String },
    /// Failed with nothing to fall back on
    Failed { error: String },
}

/// Per-source status line recorded on the assembled map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Overlay name the source feeds
    pub name: String,
    #[serde(flatten)]
    pub status: SourceStatus,
}

impl SourceReport {
    pub fn new(name: impl Into<String>, status: SourceStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, SourceStatus::Loaded { .. })
    }

    /// Banner text for a degraded source, `None` when it loaded fine
    pub fn banner(&self) -> Option<String> {
        match &self.status {
            SourceStatus::Loaded { .. } => None,
            SourceStatus::Stale { error, .. } => Some(format!(
                "{} could not be refreshed ({}); showing the last loaded data",
                self.name, error
            )),
            SourceStatus::Failed { error } => {
                Some(format!("{} could not be loaded: {}", self.name, error))
            }
        }
    }
}

/// The assembled map: base layers, the two overlays, controls, and the
/// status of every data source
#[derive(Debug)]
pub struct QuakeMap {
    pub title: String,
    pub center: LatLng,
    pub zoom: f64,
    pub fit_bounds: bool,
    base_layers: Vec<TileLayer>,
    active_base: usize,
    earthquakes: EarthquakeLayer,
    plates: Option<PlateBoundaryLayer>,
    legend: Legend,
    control: LayerControl,
    reports: Vec<SourceReport>,
}

impl QuakeMap {
    /// Puts the map together from already-loaded overlays.
    ///
    /// The earthquake overlay is always present, possibly empty. The plate
    /// overlay is left out of the layer control when it is `None`.
    pub fn assemble(
        config: &QuakeMapConfig,
        earthquakes: EarthquakeLayer,
        plates: Option<PlateBoundaryLayer>,
        reports: Vec<SourceReport>,
    ) -> Result<Self> {
        let base_layers = TileLayer::base_layers(&config.tiles);
        if base_layers.is_empty() {
            return Err(MapError::Config("no base layers configured".to_string()));
        }

        let active_base = match config.tiles.active_base.as_deref() {
            Some(name) => base_layers
                .iter()
                .position(|layer| layer.name() == name)
                .unwrap_or_else(|| {
                    warn!("base layer '{}' not available, using '{}'", name, base_layers[0].name());
                    0
                }),
            None => 0,
        };

        let mut overlays = vec![earthquakes.name().to_string()];
        if let Some(plates) = &plates {
            overlays.push(plates.name().to_string());
        }
        let control = LayerControl::new(
            base_layers.iter().map(|l| l.name().to_string()).collect(),
            overlays,
        );

        let mut map = Self {
            title: config.title.clone(),
            center: config.view.center,
            zoom: config.view.zoom,
            fit_bounds: config.view.fit_bounds,
            base_layers,
            active_base,
            earthquakes,
            plates,
            legend: Legend::default(),
            control,
            reports,
        };
        map.sync_base_visibility();
        Ok(map)
    }

    fn sync_base_visibility(&mut self) {
        let active = self.active_base;
        for (index, layer) in self.base_layers.iter_mut().enumerate() {
            layer.set_visible(index == active);
        }
    }

    pub fn base_layers(&self) -> &[TileLayer] {
        &self.base_layers
    }

    pub fn active_base_layer(&self) -> &TileLayer {
        &self.base_layers[self.active_base]
    }

    /// Makes `name` the only visible base layer
    pub fn select_base_layer(&mut self, name: &str) -> Result<()> {
        self.control.require_base_layer(name)?;
        let index = self
            .base_layers
            .iter()
            .position(|layer| layer.name() == name)
            .ok_or_else(|| MapError::Layer(format!("no base layer named '{name}'")))?;
        self.active_base = index;
        self.sync_base_visibility();
        Ok(())
    }

    pub fn earthquakes(&self) -> &EarthquakeLayer {
        &self.earthquakes
    }

    pub fn plates(&self) -> Option<&PlateBoundaryLayer> {
        self.plates.as_ref()
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn control(&self) -> &LayerControl {
        &self.control
    }

    pub fn reports(&self) -> &[SourceReport] {
        &self.reports
    }

    fn overlay_mut(&mut self, name: &str) -> Result<&mut dyn LayerTrait> {
        self.control.require_overlay(name)?;
        if self.earthquakes.name() == name {
            return Ok(&mut self.earthquakes);
        }
        match self.plates.as_mut() {
            Some(plates) if plates.name() == name => Ok(plates),
            _ => Err(MapError::Layer(format!("no overlay named '{name}'"))),
        }
    }

    pub fn is_overlay_visible(&self, name: &str) -> bool {
        if self.earthquakes.name() == name {
            return self.earthquakes.is_visible();
        }
        self.plates
            .as_ref()
            .filter(|plates| plates.name() == name)
            .map_or(false, |plates| plates.is_visible())
    }

    pub fn set_overlay_visible(&mut self, name: &str, visible: bool) -> Result<()> {
        self.overlay_mut(name)?.set_visible(visible);
        Ok(())
    }

    /// Flips an overlay and returns its new visibility
    pub fn toggle_overlay(&mut self, name: &str) -> Result<bool> {
        let layer = self.overlay_mut(name)?;
        let visible = !layer.is_visible();
        layer.set_visible(visible);
        Ok(visible)
    }

    /// Sets an overlay's opacity, clamped to `0.0..=1.0`
    pub fn set_overlay_opacity(&mut self, name: &str, opacity: f32) -> Result<()> {
        self.overlay_mut(name)?.set_opacity(opacity);
        Ok(())
    }

    /// True when any source failed or is showing stale data
    pub fn is_degraded(&self) -> bool {
        self.reports.iter().any(|r| !r.is_ok())
    }

    pub fn banner_messages(&self) -> Vec<String> {
        self.reports.iter().filter_map(SourceReport::banner).collect()
    }

    /// Combined bounds of the overlays that have data
    pub fn bounds(&self) -> Option<LatLngBounds> {
        let quakes = self.earthquakes.bounds();
        let plates = self.plates.as_ref().and_then(|p| p.bounds());
        match (quakes, plates) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    /// Bounds to fit the initial view to, when configured and available.
    /// Only the earthquakes are considered; the plate network spans the globe.
    pub fn initial_bounds(&self) -> Option<LatLngBounds> {
        if self.fit_bounds {
            self.earthquakes.bounds()
        } else {
            None
        }
    }
}
