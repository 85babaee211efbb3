use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::FeedError;
use super::parse_feed;
use crate::bulletin::RawBulletinEntry;

/// Default ARSO product root.
pub const DEFAULT_BASE_URL: &str = "https://meteo.arso.gov.si/uploads/probase/www";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Trait for fetching raw feed documents
///
/// This trait allows for mocking the HTTP client for testing purposes
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch the document at `url` as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetch a feed and decode its entries.
pub async fn fetch_entries<C: FeedClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Vec<RawBulletinEntry>, FetchError> {
    let body = client.fetch(url).await?;
    Ok(parse_feed(&body)?)
}

/// URL of the latest-observation feed for an ARSO station, e.g. `LJUBL-ANA_BEZIGRAD`.
pub fn observation_url(base_url: &str, station_id: &str) -> String {
    format!(
        "{}/observ/surface/text/sl/observation_{}_latest.rss",
        base_url.trim_end_matches('/'),
        station_id
    )
}

/// URL of the regional text forecast feed, e.g. `OSREDNJESLOVENSKA`.
pub fn forecast_url(base_url: &str, region: &str) -> String {
    format!(
        "{}/fproduct/text/sl/fcast_SI_{}_latest.rss",
        base_url.trim_end_matches('/'),
        region
    )
}

/// Real feed client implementation using reqwest
pub struct ReqwestFeedClient {
    client: reqwest::Client,
}

impl ReqwestFeedClient {
    /// Create a client whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("arso-weather/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedClient for ReqwestFeedClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

/// Mock feed client for testing
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFeedClient {
    pub responses: std::collections::HashMap<String, String>,
    pub requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockFeedClient {
    /// Create a new mock client with no canned responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`; unknown URLs answer 404
    pub fn with_response(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl FeedClient for MockFeedClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}
