use crate::{data::earthquake::EarthquakeFeature, rendering::escape_html};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text shown when an earthquake marker is clicked: location, date,
/// magnitude and depth, in that order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupContent {
    pub place: String,
    pub date: String,
    pub magnitude: f64,
    pub depth_km: f64,
}

impl PopupContent {
    pub fn for_feature(feature: &EarthquakeFeature) -> Self {
        Self {
            place: feature.place.clone(),
            date: feature
                .time
                .map_or_else(|| INVALID_DATE.to_string(), format_timestamp),
            magnitude: feature.magnitude,
            depth_km: feature.depth_km,
        }
    }

    /// Popup markup bound to the marker
    pub fn to_html(&self) -> String {
        format!(
            "<h3>Location: {}</h3><hr><p>Date: {}</p><p>Magnitude: {}</p><p>Depth: {}</p>",
            escape_html(&self.place),
            escape_html(&self.date),
            self.magnitude,
            self.depth_km
        )
    }
}

impl fmt::Display for PopupContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Location: {}", self.place)?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Magnitude: {}", self.magnitude)?;
        write!(f, "Depth: {}", self.depth_km)
    }
}

const INVALID_DATE: &str = "Invalid Date";

/// Epoch milliseconds as a browser would print `new Date(ms)` in UTC,
/// e.g. `Tue Nov 14 2023 22:13:20 GMT+0000 (Coordinated Universal Time)`.
/// Out-of-range timestamps print `Invalid Date`.
pub fn format_timestamp(epoch_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(time) => time
            .format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
            .to_string(),
        None => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quake() -> EarthquakeFeature {
        EarthquakeFeature {
            id: None,
            place: "5 km NNE of Ridgecrest, CA".to_string(),
            time: Some(1_700_000_000_000),
            magnitude: 4.5,
            depth_km: 10.0,
            longitude: -117.6,
            latitude: 35.7,
        }
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(
            format_timestamp(1_700_000_000_000),
            "Tue Nov 14 2023 22:13:20 GMT+0000 (Coordinated Universal Time)"
        );
        assert_eq!(
            format_timestamp(0),
            "Thu Jan 01 1970 00:00:00 GMT+0000 (Coordinated Universal Time)"
        );
        assert_eq!(format_timestamp(i64::MAX), "Invalid Date");
    }

    #[test]
    fn test_popup_html_field_order() {
        let popup = PopupContent::for_feature(&quake());
        assert_eq!(
            popup.to_html(),
            "<h3>Location: 5 km NNE of Ridgecrest, CA</h3><hr>\
             <p>Date: Tue Nov 14 2023 22:13:20 GMT+0000 (Coordinated Universal Time)</p>\
             <p>Magnitude: 4.5</p><p>Depth: 10</p>"
        );
    }

    #[test]
    fn test_missing_time_reads_invalid_date() {
        let mut feature = quake();
        feature.time = None;
        let popup = PopupContent::for_feature(&feature);
        assert_eq!(popup.date, "Invalid Date");
        assert!(popup.to_html().contains("<p>Date: Invalid Date</p>"));
    }

    #[test]
    fn test_popup_escapes_place() {
        let mut feature = quake();
        feature.place = "<script>alert(1)</script>".to_string();
        let html = PopupContent::for_feature(&feature).to_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_plain_text_form() {
        let text = PopupContent::for_feature(&quake()).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Location: "));
        assert!(lines[1].starts_with("Date: "));
        assert_eq!(lines[2], "Magnitude: 4.5");
        assert_eq!(lines[3], "Depth: 10");
    }
}
