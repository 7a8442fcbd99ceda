use crate::{
    core::config::FetchConfig,
    data::{geojson::GeoJson, source::GeoJsonSource},
    traits::RetryPolicy,
    MapError, Result,
};
use log::{debug, error, info, warn};

/// Fetches and parses GeoJSON documents with a per-attempt timeout and
/// bounded retries. A failed load is an error, never an empty collection.
#[derive(Debug, Clone, Default)]
pub struct FeedLoader {
    config: FetchConfig,
}

impl FeedLoader {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Load one document, retrying transient failures.
    ///
    /// Returns [`MapError::FetchExhausted`] once the retry budget is spent or
    /// a non-retryable error (bad status, malformed JSON) is hit.
    pub async fn load(&self, source: &dyn GeoJsonSource) -> Result<GeoJson> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!("fetch {} attempt {}", source.name(), attempt);

            match self.attempt(source).await {
                Ok(geojson) => {
                    info!(
                        "loaded {} ({} features)",
                        source.name(),
                        geojson.len()
                    );
                    return Ok(geojson);
                }
                Err(e) if e.is_retryable() && self.config.should_retry(attempt) => {
                    let delay = self.config.delay_for_retry(attempt);
                    warn!(
                        "{} failed on attempt {}: {} (retrying in {:?})",
                        source.name(),
                        attempt,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!("giving up on {} after {} attempt(s): {}", source.name(), attempt, e);
                    return Err(MapError::FetchExhausted {
                        origin: source.name().to_string(),
                        attempts: attempt,
                        last_error: Box::new(e),
                    });
                }
            }
        }
    }

    async fn attempt(&self, source: &dyn GeoJsonSource) -> Result<GeoJson> {
        let text = tokio::time::timeout(self.config.timeout(), source.fetch_text())
            .await
            .map_err(|_| MapError::Timeout {
                origin: source.name().to_string(),
                timeout_ms: self.config.timeout_ms,
            })??;
        GeoJson::parse(&text, source.name())
    }
}
