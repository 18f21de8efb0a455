use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{DateRange, MAX_FEED_WINDOW_DAYS};

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Every way a feed request can fail. All of them end the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed feed body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Raw feed payload. Objects are kept as JSON so one bad entry can be skipped later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub element_count: Option<u64>,
    pub near_earth_objects: BTreeMap<String, Vec<serde_json::Value>>,
}

impl FeedResponse {
    /// Total object entries across all dates
    pub fn object_count(&self) -> usize {
        self.near_earth_objects.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone)]
pub struct NeoFeedClient {
    client: reqwest::Client,
    feed_url: String,
    api_key: String,
    timeout: Duration,
}

impl NeoFeedClient {
    pub fn new(feed_url: String, api_key: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            feed_url,
            api_key,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(
            config.feed_url.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )
    }

    /// One GET against the feed endpoint. No retries.
    pub async fn fetch_feed(&self, range: &DateRange) -> Result<FeedResponse, FetchError> {
        if range.span_days() > MAX_FEED_WINDOW_DAYS {
            warn!(
                "Requested window spans {} days; upstream usually rejects more than {}",
                range.span_days(),
                MAX_FEED_WINDOW_DAYS
            );
        }

        info!(
            "Fetching NEO feed {} .. {} from {}",
            range.start_param(),
            range.end_param(),
            self.feed_url
        );

        let response = self
            .client
            .get(&self.feed_url)
            .query(&[
                ("start_date", range.start_param()),
                ("end_date", range.end_param()),
                ("api_key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        debug!("Feed responded with HTTP {} ({} bytes)", status.as_u16(), body.len());

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
            });
        }

        let feed: FeedResponse = serde_json::from_str(&body)?;
        info!(
            "Feed contains {} objects across {} dates",
            feed.object_count(),
            feed.near_earth_objects.len()
        );
        Ok(feed)
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            // reqwest errors carry the full URL, which includes the key
            FetchError::Transport(err.without_url())
        }
    }
}

/// Build a client from `config` and run the single feed request.
///
/// A client that cannot be built fails the same way as the request itself.
pub async fn fetch_with_config(
    config: &Config,
    range: &DateRange,
) -> Result<FeedResponse, FetchError> {
    NeoFeedClient::from_config(config)?.fetch_feed(range).await
}
