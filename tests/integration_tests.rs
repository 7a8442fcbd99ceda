use async_trait::async_trait;
use quakemap::prelude::*;
use quakemap::{GeoJsonSource, SourceStatus, StaticSource};
use std::sync::atomic::{AtomicU32, Ordering};

/// Integration tests covering the whole fetch, encode, assemble and render
/// pipeline against in-memory sources
#[cfg(test)]
mod integration_tests {
    use super::*;

    const WEEK_FEED: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"title": "USGS All Earthquakes, Past Week", "count": 4},
        "features": [
            {"type": "Feature", "id": "ci40000001", "properties": {"mag": 1.3, "place": "8 km NW of Anza, CA", "time": 1700000000000}, "geometry": {"type": "Point", "coordinates": [-116.73, 33.60, -0.8]}},
            {"type": "Feature", "id": "us7000aaaa", "properties": {"mag": 6.5, "place": "Banda Sea", "time": 1700000500000}, "geometry": {"type": "Point", "coordinates": [129.9, -6.5, 152.4]}},
            {"type": "Feature", "id": "nn00000002", "properties": {"mag": null, "place": "Nevada", "time": 1700000600000}, "geometry": {"type": "Point", "coordinates": [-117.9, 38.1, 7.3]}},
            {"type": "Feature", "id": "ak00000003", "properties": {"mag": 2.7, "place": "Southern Alaska", "time": 1700000700000}, "geometry": {"type": "Point", "coordinates": [-151.2, 60.1, 50.0]}}
        ]
    }"#;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"LAYER": "plate boundary", "Name": "PA-NA"}, "geometry": {"type": "LineString", "coordinates": [[-124.5, 40.3], [-122.0, 37.5], [-115.5, 32.6]]}},
            {"type": "Feature", "properties": {"LAYER": "plate boundary", "Name": "AU-SU"}, "geometry": {"type": "LineString", "coordinates": [[125.0, -8.0], [131.0, -6.0]]}}
        ]
    }"#;

    const EMPTY: &str = r#"{"type": "FeatureCollection", "features": []}"#;

    /// Always answers with a server error
    struct Unavailable {
        calls: AtomicU32,
    }

    #[async_trait]
    impl GeoJsonSource for Unavailable {
        fn name(&self) -> &str {
            "unavailable"
        }

        async fn fetch_text(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MapError::HttpStatus {
                url: "https://plates.invalid/boundaries.json".to_string(),
                status: 503,
            })
        }
    }

    fn builder() -> MapBuilder {
        MapBuilder::new()
            .with_access_token("pk.test")
            .with_retries(2, 1, true)
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let map = builder()
            .with_earthquake_source(Box::new(StaticSource::new("quakes", WEEK_FEED)))
            .with_plate_source(Box::new(StaticSource::new("plates", BOUNDARIES)))
            .assemble()
            .await
            .unwrap();

        let quakes = map.earthquakes();
        assert_eq!(quakes.len(), 3);
        assert_eq!(quakes.skipped(), 1);

        let colors: Vec<DepthColor> = quakes.markers().iter().map(|m| m.style.fill_color).collect();
        assert_eq!(
            colors,
            vec![DepthColor::Lime, DepthColor::Red, DepthColor::Orange]
        );
        assert_eq!(quakes.markers()[1].style.radius, 65_000.0);
        assert_eq!(map.plates().unwrap().len(), 2);
        assert_eq!(
            map.reports()[0].status,
            SourceStatus::Loaded {
                features: 3,
                skipped: 1
            }
        );
        assert!(!map.is_degraded());
    }

    #[tokio::test]
    async fn test_malformed_records_are_skipped_not_fatal() {
        let null_depth = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": "good", "properties": {"mag": 4.4, "place": "Crete, Greece", "time": 1700000000000}, "geometry": {"type": "Point", "coordinates": [25.1, 35.0, 12.0]}},
            {"type": "Feature", "id": "bad", "properties": {"mag": 3.0, "place": "Aegean Sea", "time": 1700000100000}, "geometry": {"type": "Point", "coordinates": [25.9, 38.2, null]}}
        ]}"#;
        let no_coordinates = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": "good", "properties": {"mag": 4.4, "place": "Crete, Greece", "time": 1700000000000}, "geometry": {"type": "Point", "coordinates": [25.1, 35.0, 12.0]}},
            {"type": "Feature", "id": "bad", "properties": {"mag": 3.0, "place": "Aegean Sea", "time": 1700000100000}, "geometry": {"type": "Point"}}
        ]}"#;
        let broken_plates = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"Name": "AF-EU"}, "geometry": {"type": "LineString", "coordinates": [[-29.8, 39.4], [-25.0, 37.0]]}},
            {"type": "Feature", "properties": {"Name": "bad"}, "geometry": {"type": "LineString"}}
        ]}"#;

        for feed in [null_depth, no_coordinates] {
            let map = MapBuilder::new()
                .with_fetch_profile(FetchProfile::FailFast)
                .with_earthquake_source(Box::new(StaticSource::new("quakes", feed)))
                .with_plate_source(Box::new(StaticSource::new("plates", broken_plates)))
                .assemble()
                .await
                .unwrap();

            assert_eq!(map.earthquakes().len(), 1);
            assert_eq!(map.earthquakes().skipped(), 1);
            assert_eq!(
                map.reports()[0].status,
                SourceStatus::Loaded {
                    features: 1,
                    skipped: 1
                }
            );
            assert_eq!(
                map.reports()[1].status,
                SourceStatus::Loaded {
                    features: 1,
                    skipped: 1
                }
            );
            assert!(!map.is_degraded());
        }
    }

    #[tokio::test]
    async fn test_empty_feed_still_has_base_layers_and_plates() {
        let map = builder()
            .with_earthquake_source(Box::new(StaticSource::new("quakes", EMPTY)))
            .with_plate_source(Box::new(StaticSource::new("plates", BOUNDARIES)))
            .assemble()
            .await
            .unwrap();

        assert!(map.earthquakes().is_empty());
        assert_eq!(map.base_layers().len(), 3);
        assert_eq!(map.plates().unwrap().len(), 2);
        assert!(map.banner_messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_plate_failure_is_not_fatal() {
        let map = builder()
            .with_earthquake_source(Box::new(StaticSource::new("quakes", WEEK_FEED)))
            .with_plate_source(Box::new(Unavailable {
                calls: AtomicU32::new(0),
            }))
            .assemble()
            .await
            .unwrap();

        assert_eq!(map.earthquakes().len(), 3);
        assert!(map.plates().is_none());
        assert!(matches!(map.reports()[1].status, SourceStatus::Failed { .. }));
        assert_eq!(map.control().overlays, vec!["Earthquakes".to_string()]);

        let html = HtmlRenderer::new().render(&map).unwrap();
        assert!(html.contains("class=\"banner\""));
        assert!(html.contains("Tectonic Plates could not be loaded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_bounded() {
        let source = Unavailable {
            calls: AtomicU32::new(0),
        };
        let loader = FeedLoader::new(FetchConfig {
            max_retries: 2,
            retry_delay_ms: 10,
            ..FetchConfig::default()
        });
        let err = loader.load(&source).await.unwrap_err();

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert!(matches!(err, MapError::FetchExhausted { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn test_rendered_page_has_legend_and_layers() {
        let map = builder()
            .with_earthquake_source(Box::new(StaticSource::new("quakes", WEEK_FEED)))
            .with_plate_source(Box::new(StaticSource::new("plates", BOUNDARIES)))
            .assemble()
            .await
            .unwrap();
        let html = HtmlRenderer::new().render(&map).unwrap();

        assert!(html.contains("Depth<br><hr>"));
        assert!(html.contains("90+"));
        assert!(html.contains("mapbox/satellite-streets-v12"));
        assert!(html.contains("\"collapsed\":false"));
        assert!(html.contains("Location: Banda Sea"));
        assert!(!html.contains("class=\"banner\""));
    }

    #[tokio::test]
    async fn test_written_document() {
        let map = builder()
            .with_earthquake_source(Box::new(StaticSource::new("quakes", EMPTY)))
            .with_plate_source(Box::new(StaticSource::new("plates", EMPTY)))
            .assemble()
            .await
            .unwrap();

        let path = std::env::temp_dir().join(format!("quakemap-test-{}.html", std::process::id()));
        HtmlRenderer::new().write_to(&map, &path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(written.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_legend_agrees_with_classifier() {
        let legend = build_legend();
        assert_eq!(legend.len(), 6);
        for entry in &legend {
            assert_eq!(entry.color, classify_depth(entry.lower_bound + 1.0));
            if let Some(upper) = entry.upper_bound {
                assert_ne!(classify_depth(upper - 0.001), classify_depth(upper));
            }
        }
    }

    #[test]
    fn test_classifier_boundaries() {
        for threshold in DEPTH_THRESHOLDS_KM {
            assert_eq!(depth_bin(threshold).lower_km, Some(threshold));
        }
        assert_eq!(classify_depth(-5.0), classify_depth(0.0));
        assert_eq!(classify_depth(-5.0), DepthColor::Lime);
        assert_eq!(classify_depth(15.0), classify_depth(10.0));
    }

    #[test]
    fn test_magnitude_monotonic() {
        let magnitudes = [0.0, 0.1, 1.0, 2.5, 4.9, 5.0, 7.8, 9.5];
        for pair in magnitudes.windows(2) {
            assert!(scale_magnitude(pair[0]) < scale_magnitude(pair[1]));
        }
    }
}
