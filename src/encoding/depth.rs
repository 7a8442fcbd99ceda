//! Depth classification
//!
//! Six ordered bins over depth in km: `(-inf,10) [10,30) [30,50) [50,70)
//! [70,90) [90,+inf)`. A depth equal to a threshold belongs to the deeper
//! bin. [`DEPTH_THRESHOLDS_KM`] is the only copy of the thresholds; the
//! legend is derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper (exclusive) bounds of the first five bins, ascending
pub const DEPTH_THRESHOLDS_KM: [f64; 5] = [10.0, 30.0, 50.0, 70.0, 90.0];

/// Fill color of a depth bin, shallow to deep.
/// Serializes to the CSS color Leaflet receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DepthColor {
    #[serde(rename = "#00FF00")]
    Lime,
    #[serde(rename = "greenyellow")]
    GreenYellow,
    #[serde(rename = "yellow")]
    Yellow,
    #[serde(rename = "orange")]
    Orange,
    #[serde(rename = "orangered")]
    OrangeRed,
    #[serde(rename = "#FF0000")]
    Red,
}

impl DepthColor {
    pub const ALL: [DepthColor; 6] = [
        DepthColor::Lime,
        DepthColor::GreenYellow,
        DepthColor::Yellow,
        DepthColor::Orange,
        DepthColor::OrangeRed,
        DepthColor::Red,
    ];

    pub fn as_css(&self) -> &'static str {
        match self {
            DepthColor::Lime => "#00FF00",
            DepthColor::GreenYellow => "greenyellow",
            DepthColor::Yellow => "yellow",
            DepthColor::Orange => "orange",
            DepthColor::OrangeRed => "orangered",
            DepthColor::Red => "#FF0000",
        }
    }

    /// Color of the bin at `index` (0 = shallowest); indexes past the last
    /// bin saturate to the deepest color
    pub fn for_bin(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

impl fmt::Display for DepthColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// One of the six depth intervals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBin {
    /// 0 for the shallowest bin, 5 for the deepest
    pub index: usize,
    /// Inclusive lower bound, `None` for the open shallow end
    pub lower_km: Option<f64>,
    /// Exclusive upper bound, `None` for the open deep end
    pub upper_km: Option<f64>,
}

impl DepthBin {
    pub fn color(&self) -> DepthColor {
        DepthColor::for_bin(self.index)
    }

    pub fn contains(&self, depth_km: f64) -> bool {
        self.lower_km.map_or(true, |lower| depth_km >= lower)
            && self.upper_km.map_or(true, |upper| depth_km < upper)
    }

    /// Bin number `index`, clamped to the deepest bin
    pub fn at(index: usize) -> DepthBin {
        let index = index.min(DEPTH_THRESHOLDS_KM.len());
        DepthBin {
            index,
            lower_km: index.checked_sub(1).map(|i| DEPTH_THRESHOLDS_KM[i]),
            upper_km: DEPTH_THRESHOLDS_KM.get(index).copied(),
        }
    }

    /// All six bins, shallowest first
    pub fn all() -> impl Iterator<Item = DepthBin> {
        (0..=DEPTH_THRESHOLDS_KM.len()).map(DepthBin::at)
    }
}

/// Bin containing `depth_km`: the first threshold the depth is strictly
/// below, else the deepest bin. `NaN` is below nothing and lands in the
/// deepest bin.
pub fn depth_bin(depth_km: f64) -> DepthBin {
    let index = DEPTH_THRESHOLDS_KM
        .iter()
        .position(|&threshold| depth_km < threshold)
        .unwrap_or(DEPTH_THRESHOLDS_KM.len());
    DepthBin::at(index)
}

/// Marker fill color for an earthquake at `depth_km`
pub fn classify_depth(depth_km: f64) -> DepthColor {
    depth_bin(depth_km).color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_at_index() {
        assert_eq!(DepthBin::at(0).lower_km, None);
        assert_eq!(DepthBin::at(0).upper_km, Some(10.0));
        assert_eq!(DepthBin::at(3).lower_km, Some(50.0));
        assert_eq!(DepthBin::at(3).upper_km, Some(70.0));
        assert_eq!(DepthBin::at(5).upper_km, None);
        assert_eq!(DepthBin::at(42), DepthBin::at(5));
        assert_eq!(depth_bin(55.0), DepthBin::at(3));
    }

    #[test]
    fn test_each_bin_has_its_color() {
        assert_eq!(classify_depth(5.0), DepthColor::Lime);
        assert_eq!(classify_depth(15.0), DepthColor::GreenYellow);
        assert_eq!(classify_depth(35.0), DepthColor::Yellow);
        assert_eq!(classify_depth(55.0), DepthColor::Orange);
        assert_eq!(classify_depth(75.0), DepthColor::OrangeRed);
        assert_eq!(classify_depth(650.0), DepthColor::Red);
    }

    #[test]
    fn test_boundaries_belong_to_upper_bin() {
        for (i, &threshold) in DEPTH_THRESHOLDS_KM.iter().enumerate() {
            assert_eq!(depth_bin(threshold).index, i + 1, "threshold {threshold}");
            assert_eq!(depth_bin(threshold - 1e-9).index, i, "just below {threshold}");
            assert_ne!(classify_depth(threshold), classify_depth(threshold - 1e-9));
        }
    }

    #[test]
    fn test_shallow_bin_is_open_below() {
        assert_eq!(classify_depth(-5.0), DepthColor::Lime);
        assert_eq!(classify_depth(-3500.0), DepthColor::Lime);
        assert_eq!(classify_depth(f64::NEG_INFINITY), DepthColor::Lime);
    }

    #[test]
    fn test_nan_is_deepest() {
        assert_eq!(classify_depth(f64::NAN), DepthColor::Red);
    }

    #[test]
    fn test_same_bin_same_color() {
        let samples = [-40.0, -0.5, 0.0, 9.99, 10.0, 29.9, 30.0, 49.0, 50.0, 69.5, 70.0, 89.9, 90.0, 700.0];
        for &a in &samples {
            for &b in &samples {
                if depth_bin(a).index == depth_bin(b).index {
                    assert_eq!(classify_depth(a), classify_depth(b), "{a} vs {b}");
                } else {
                    assert_ne!(classify_depth(a), classify_depth(b), "{a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn test_color_is_monotonic_in_depth() {
        let mut previous = classify_depth(-100.0);
        let mut depth = -100.0;
        while depth < 200.0 {
            let color = classify_depth(depth);
            assert!(color >= previous);
            previous = color;
            depth += 0.25;
        }
    }

    #[test]
    fn test_bins_partition_the_line() {
        let bins: Vec<DepthBin> = DepthBin::all().collect();
        assert_eq!(bins.len(), 6);
        assert_eq!(bins[0].lower_km, None);
        assert_eq!(bins[5].upper_km, None);
        for pair in bins.windows(2) {
            assert_eq!(pair[0].upper_km, pair[1].lower_km);
        }
        for depth in [-20.0, 10.0, 42.0, 90.0, 300.0] {
            let containing: Vec<_> = bins.iter().filter(|b| b.contains(depth)).collect();
            assert_eq!(containing.len(), 1);
            assert_eq!(containing[0].index, depth_bin(depth).index);
        }
    }

    #[test]
    fn test_serializes_as_css() {
        assert_eq!(serde_json::to_string(&DepthColor::Lime).unwrap(), "\"#00FF00\"");
        assert_eq!(serde_json::to_string(&DepthColor::OrangeRed).unwrap(), "\"orangered\"");
        for color in DepthColor::ALL {
            assert_eq!(
                serde_json::to_value(color).unwrap(),
                serde_json::Value::String(color.as_css().to_string())
            );
        }
    }
}
