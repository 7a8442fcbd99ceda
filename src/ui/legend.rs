//! Depth legend
//!
//! Entries are derived from the classifier's thresholds and colored by
//! calling the classifier itself, so the legend cannot drift from the
//! markers.

use crate::{
    core::constants::LEGEND_FLOOR_KM,
    encoding::depth::{classify_depth, DepthColor, DEPTH_THRESHOLDS_KM},
    rendering::escape_html,
    ui::controls::ControlPosition,
};
use serde::{Deserialize, Serialize};

/// One swatch of the depth legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub lower_bound: f64,
    /// `None` for the open-ended deepest entry
    pub upper_bound: Option<f64>,
    pub color: DepthColor,
}

impl LegendEntry {
    /// `-10–10` style range, or `90+` for the open-ended entry
    pub fn label(&self) -> String {
        match self.upper_bound {
            Some(upper) => format!("{}\u{2013}{}", self.lower_bound, upper),
            None => format!("{}+", self.lower_bound),
        }
    }
}

/// The six depth entries, shallowest first
pub fn build_legend() -> Vec<LegendEntry> {
    let lower_bounds = std::iter::once(LEGEND_FLOOR_KM).chain(DEPTH_THRESHOLDS_KM);
    let upper_bounds = DEPTH_THRESHOLDS_KM.into_iter().map(Some).chain(std::iter::once(None));

    lower_bounds
        .zip(upper_bounds)
        .map(|(lower_bound, upper_bound)| LegendEntry {
            lower_bound,
            upper_bound,
            color: classify_depth(lower_bound + 1.0),
        })
        .collect()
}

/// Legend control placed on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub position: ControlPosition,
    pub entries: Vec<LegendEntry>,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            title: "Depth".to_string(),
            position: ControlPosition::BottomRight,
            entries: build_legend(),
        }
    }
}

impl Legend {
    /// Inner markup of the legend box: title, rule, then one swatch per
    /// entry with a line break between ranges
    pub fn to_html(&self) -> String {
        let mut html = format!("{}<br><hr>", escape_html(&self.title));
        for entry in &self.entries {
            html.push_str(&format!(
                "<i style=\"background:{}\"></i> {}",
                entry.color.as_css(),
                entry.label().replace('\u{2013}', "&ndash;")
            ));
            if entry.upper_bound.is_some() {
                html.push_str("<br>");
            }
        }
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_entries_in_order() {
        let legend = build_legend();
        let bounds: Vec<(f64, Option<f64>)> = legend
            .iter()
            .map(|e| (e.lower_bound, e.upper_bound))
            .collect();
        assert_eq!(
            bounds,
            vec![
                (-10.0, Some(10.0)),
                (10.0, Some(30.0)),
                (30.0, Some(50.0)),
                (50.0, Some(70.0)),
                (70.0, Some(90.0)),
                (90.0, None),
            ]
        );
    }

    #[test]
    fn test_colors_match_classifier() {
        for entry in build_legend() {
            assert_eq!(entry.color, classify_depth(entry.lower_bound + 1.0));
        }
        let colors: Vec<DepthColor> = build_legend().into_iter().map(|e| e.color).collect();
        assert_eq!(colors, DepthColor::ALL.to_vec());
    }

    #[test]
    fn test_labels() {
        let labels: Vec<String> = build_legend().iter().map(LegendEntry::label).collect();
        assert_eq!(labels[0], "-10\u{2013}10");
        assert_eq!(labels[4], "70\u{2013}90");
        assert_eq!(labels[5], "90+");
    }

    #[test]
    fn test_legend_markup() {
        let html = Legend::default().to_html();
        assert!(html.starts_with("Depth<br><hr>"));
        assert!(html.contains("<i style=\"background:#00FF00\"></i> -10&ndash;10<br>"));
        assert!(html.ends_with("<i style=\"background:#FF0000\"></i> 90+"));
        assert_eq!(html.matches("<i ").count(), 6);
    }
}
