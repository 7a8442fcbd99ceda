use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Corner of the map a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlPosition {
    #[serde(rename = "topleft")]
    TopLeft,
    #[serde(rename = "topright")]
    TopRight,
    #[serde(rename = "bottomleft")]
    BottomLeft,
    #[serde(rename = "bottomright")]
    BottomRight,
}

impl ControlPosition {
    /// Position string understood by Leaflet controls
    pub fn as_leaflet(&self) -> &'static str {
        match self {
            ControlPosition::TopLeft => "topleft",
            ControlPosition::TopRight => "topright",
            ControlPosition::BottomLeft => "bottomleft",
            ControlPosition::BottomRight => "bottomright",
        }
    }
}

impl Default for ControlPosition {
    fn default() -> Self {
        Self::TopRight
    }
}

/// Base layer radio list plus overlay checkboxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerControl {
    pub base_layers: Vec<String>,
    pub overlays: Vec<String>,
    /// Whether the control starts folded into an icon
    pub collapsed: bool,
    pub position: ControlPosition,
}

impl LayerControl {
    pub fn new(base_layers: Vec<String>, overlays: Vec<String>) -> Self {
        Self {
            base_layers,
            overlays,
            collapsed: false,
            position: ControlPosition::default(),
        }
    }

    pub fn has_base_layer(&self, name: &str) -> bool {
        self.base_layers.iter().any(|n| n == name)
    }

    pub fn has_overlay(&self, name: &str) -> bool {
        self.overlays.iter().any(|n| n == name)
    }

    /// Fails for names the control does not list
    pub fn require_overlay(&self, name: &str) -> Result<()> {
        if self.has_overlay(name) {
            Ok(())
        } else {
            Err(MapError::Layer(format!("no overlay named '{name}'")))
        }
    }

    pub fn require_base_layer(&self, name: &str) -> Result<()> {
        if self.has_base_layer(name) {
            Ok(())
        } else {
            Err(MapError::Layer(format!("no base layer named '{name}'")))
        }
    }
}
