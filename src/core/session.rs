//! Repeated map assembly over the same pair of sources
//!
//! A session remembers the last successfully loaded earthquakes and plate
//! boundaries. When a later fetch fails, that snapshot is shown instead and
//! the source is reported as stale rather than failed.

use crate::{
    core::{
        config::QuakeMapConfig,
        map::{QuakeMap, SourceReport, SourceStatus},
    },
    data::{loader::FeedLoader, source::GeoJsonSource},
    encoding::feature::{encode_collection, EncodedCollection},
    layers::{marker::EarthquakeLayer, vector::PlateBoundaryLayer},
    Result,
};
use log::{info, warn};

pub struct MapSession {
    config: QuakeMapConfig,
    loader: FeedLoader,
    earthquake_source: Box<dyn GeoJsonSource>,
    plate_source: Box<dyn GeoJsonSource>,
    last_earthquakes: Option<EncodedCollection>,
    last_plates: Option<PlateBoundaryLayer>,
    refreshes: u64,
}

impl MapSession {
    pub fn new(
        config: QuakeMapConfig,
        earthquake_source: Box<dyn GeoJsonSource>,
        plate_source: Box<dyn GeoJsonSource>,
    ) -> Self {
        let loader = FeedLoader::new(config.fetch.resolve());
        Self {
            config,
            loader,
            earthquake_source,
            plate_source,
            last_earthquakes: None,
            last_plates: None,
            refreshes: 0,
        }
    }

    pub fn config(&self) -> &QuakeMapConfig {
        &self.config
    }

    /// Number of completed refreshes
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Fetches both sources concurrently and assembles a fresh map.
    ///
    /// Source failures never fail the refresh; they are recorded on the map.
    /// Only an unusable configuration returns an error.
    pub async fn refresh(&mut self) -> Result<QuakeMap> {
        let (quakes, plates) = tokio::join!(
            self.loader.load(self.earthquake_source.as_ref()),
            self.loader.load(self.plate_source.as_ref()),
        );

        let mut reports = Vec::with_capacity(2);

        let earthquakes = match quakes {
            Ok(geojson) => {
                let encoded = encode_collection(&geojson, &self.config.encoding);
                reports.push(SourceReport::new(
                    EarthquakeLayer::NAME,
                    SourceStatus::Loaded {
                        features: encoded.features.len(),
                        skipped: encoded.skipped_count(),
                    },
                ));
                let layer = EarthquakeLayer::from_encoded(&encoded);
                self.last_earthquakes = Some(encoded);
                layer
            }
            Err(e) => match &self.last_earthquakes {
                Some(previous) => {
                    warn!("earthquake refresh failed, keeping previous snapshot: {}", e);
                    reports.push(SourceReport::new(
                        EarthquakeLayer::NAME,
                        SourceStatus::Stale {
                            features: previous.features.len(),
                            error: e.to_string(),
                        },
                    ));
                    EarthquakeLayer::from_encoded(previous)
                }
                None => {
                    reports.push(SourceReport::new(
                        EarthquakeLayer::NAME,
                        SourceStatus::Failed {
                            error: e.to_string(),
                        },
                    ));
                    EarthquakeLayer::empty()
                }
            },
        };

        let plates = match plates {
            Ok(geojson) => {
                let layer = PlateBoundaryLayer::from_geojson(&geojson);
                reports.push(SourceReport::new(
                    PlateBoundaryLayer::NAME,
                    SourceStatus::Loaded {
                        features: layer.len(),
                        skipped: layer.skipped(),
                    },
                ));
                self.last_plates = Some(layer.clone());
                Some(layer)
            }
            Err(e) => match &self.last_plates {
                Some(previous) => {
                    warn!("plate boundary refresh failed, keeping previous snapshot: {}", e);
                    reports.push(SourceReport::new(
                        PlateBoundaryLayer::NAME,
                        SourceStatus::Stale {
                            features: previous.len(),
                            error: e.to_string(),
                        },
                    ));
                    Some(previous.clone())
                }
                None => {
                    reports.push(SourceReport::new(
                        PlateBoundaryLayer::NAME,
                        SourceStatus::Failed {
                            error: e.to_string(),
                        },
                    ));
                    None
                }
            },
        };

        let map = QuakeMap::assemble(&self.config, earthquakes, plates, reports)?;
        self.refreshes += 1;
        info!(
            "map assembled: {} earthquakes, {} plate boundaries{}",
            map.earthquakes().len(),
            map.plates().map_or(0, PlateBoundaryLayer::len),
            if map.is_degraded() { " (degraded)" } else { "" }
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::StaticSource;
    use crate::layers::base::LayerTrait;
    use crate::MapError;
    use async_trait::async_trait;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    const QUAKES: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "id": "q1", "properties": {"place": "Kermadec Islands", "time": 1700000000000, "mag": 5.6}, "geometry": {"type": "Point", "coordinates": [-177.9, -30.1, 25.0]}}
    ]}"#;

    const PLATES: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[-178.0, -29.0], [-177.0, -31.0]]}}
    ]}"#;

    /// Serves a fixed body until switched off
    struct Switchable {
        body: &'static str,
        up: Arc<AtomicBool>,
    }

    #[async_trait]
    impl GeoJsonSource for Switchable {
        fn name(&self) -> &str {
            "switchable"
        }

        async fn fetch_text(&self) -> Result<String> {
            if self.up.load(Ordering::SeqCst) {
                Ok(self.body.to_string())
            } else {
                Err(MapError::HttpStatus {
                    url: "https://example.invalid/feed".to_string(),
                    status: 404,
                })
            }
        }
    }

    fn config() -> QuakeMapConfig {
        QuakeMapConfig {
            fetch: crate::core::config::FetchProfile::FailFast,
            ..QuakeMapConfig::default()
        }
    }

    #[tokio::test]
    async fn test_refresh_loads_both() {
        let mut session = MapSession::new(
            config(),
            Box::new(StaticSource::new("quakes", QUAKES)),
            Box::new(StaticSource::new("plates", PLATES)),
        );
        let map = session.refresh().await.unwrap();

        assert_eq!(map.earthquakes().len(), 1);
        assert_eq!(map.plates().unwrap().len(), 1);
        assert!(!map.is_degraded());
        assert_eq!(session.refreshes(), 1);
    }

    #[tokio::test]
    async fn test_stale_snapshot_after_failure() {
        let up = Arc::new(AtomicBool::new(true));
        let mut session = MapSession::new(
            config(),
            Box::new(Switchable {
                body: QUAKES,
                up: up.clone(),
            }),
            Box::new(Switchable {
                body: PLATES,
                up: up.clone(),
            }),
        );
        session.refresh().await.unwrap();

        up.store(false, Ordering::SeqCst);
        let map = session.refresh().await.unwrap();

        assert_eq!(map.earthquakes().len(), 1);
        assert!(map.plates().is_some());
        assert!(map.is_degraded());
        assert!(matches!(
            map.reports()[0].status,
            SourceStatus::Stale { features: 1, .. }
        ));
        assert!(map.banner_messages()[1].starts_with("Tectonic Plates could not be refreshed"));
        assert!(map.plates().unwrap().is_visible());
    }

    #[tokio::test]
    async fn test_failure_without_snapshot() {
        let up = Arc::new(AtomicBool::new(false));
        let mut session = MapSession::new(
            config(),
            Box::new(Switchable {
                body: QUAKES,
                up: up.clone(),
            }),
            Box::new(StaticSource::new("plates", PLATES)),
        );
        let map = session.refresh().await.unwrap();

        assert!(map.earthquakes().is_empty());
        assert!(matches!(map.reports()[0].status, SourceStatus::Failed { .. }));
        assert!(matches!(map.reports()[1].status, SourceStatus::Loaded { .. }));
    }
}
