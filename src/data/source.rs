use crate::{core::constants, MapError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;

/// Shared HTTP client with a custom User-Agent so that public feeds don't
/// reject the request. Building the client once avoids the cost of TLS and
/// connection pool setup for every fetch.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(constants::USER_AGENT)
        .build()
        .unwrap_or_default()
});

/// Anything that can produce the raw text of a GeoJSON document.
#[async_trait]
pub trait GeoJsonSource: Send + Sync {
    /// Human-readable name used in logs, errors and status banners
    fn name(&self) -> &str;

    /// Fetch the document once. Retries are the loader's business.
    async fn fetch_text(&self) -> Result<String>;
}

/// A GeoJSON document served over plain HTTP GET
pub struct HttpSource {
    name: String,
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_client(name, url, HTTP_CLIENT.clone())
    }

    pub fn with_client(name: impl Into<String>, url: impl Into<String>, client: Client) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client,
        }
    }

    /// Builds a source whose client announces `user_agent`
    pub fn with_user_agent(
        name: impl Into<String>,
        url: impl Into<String>,
        user_agent: &str,
    ) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self::with_client(name, url, client))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl GeoJsonSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_text(&self) -> Result<String> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(MapError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

/// A document already held in memory, e.g. read from a local file
pub struct StaticSource {
    name: String,
    body: String,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    /// Reads the whole file up front
    pub async fn from_file(name: impl Into<String>, path: &std::path::Path) -> Result<Self> {
        let body = tokio::fs::read_to_string(path).await?;
        Ok(Self::new(name, body))
    }
}

#[async_trait]
impl GeoJsonSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_text(&self) -> Result<String> {
        Ok(self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_returns_body() {
        let source = StaticSource::new("inline", "{\"type\":\"FeatureCollection\",\"features\":[]}");
        assert_eq!(source.name(), "inline");
        assert!(source.fetch_text().await.unwrap().contains("FeatureCollection"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = StaticSource::from_file("file", std::path::Path::new("/nonexistent/quakes.geojson"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, MapError::Io(_)));
    }

    #[test]
    fn test_http_source_keeps_url() {
        let source = HttpSource::new("Earthquakes", constants::EARTHQUAKE_FEED_URL);
        assert_eq!(source.url(), constants::EARTHQUAKE_FEED_URL);
        assert_eq!(source.name(), "Earthquakes");
    }
}
