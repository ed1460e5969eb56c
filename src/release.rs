use async_trait::async_trait;
use reqwest::{Client, Url};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, SyncError};
use crate::model::{Asset, RawAsset, Release};

/// Client for the public release feed publishing packaged calendar files.
#[derive(Clone)]
pub struct ReleaseClient {
    http: Client,
    latest_url: Url,
    timeout: Duration,
}

impl fmt::Debug for ReleaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseClient")
            .field("latest_url", &self.latest_url)
            .finish_non_exhaustive()
    }
}

/// Seam over the release feed so the facade can be exercised against mocks.
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    /// Retrieve the latest release's asset list with derived location
    /// fields. No retries; the caller owns retry policy.
    async fn fetch_latest_assets(&self) -> Result<Vec<Asset>>;
}

impl ReleaseClient {
    pub fn new(latest_url: Url, timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent("shedsync/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self {
            http,
            latest_url,
            timeout,
        }
    }

    pub async fn fetch_latest_assets(&self) -> Result<Vec<Asset>> {
        debug!(url = %self.latest_url, "fetching latest release");
        let res = self
            .http
            .get(self.latest_url.clone())
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            // 403/429 rate limits included; the feed is externally owned.
            let body = res.text().await.unwrap_or_default();
            return Err(SyncError::UpstreamUnavailable {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let release: Release = res.json().await?;
        let mut assets = Vec::with_capacity(release.assets.len());
        for (idx, entry) in release.assets.into_iter().enumerate() {
            // A single malformed entry must not sink the whole fetch.
            let raw: RawAsset = match serde_json::from_value(entry) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(%err, idx, "skipping malformed release asset");
                    continue;
                }
            };
            assets.push(Asset::from_raw(raw));
        }
        debug!(count = assets.len(), "release assets normalized");
        Ok(assets)
    }
}

#[async_trait]
impl ReleaseFeed for ReleaseClient {
    async fn fetch_latest_assets(&self) -> Result<Vec<Asset>> {
        ReleaseClient::fetch_latest_assets(self).await
    }
}
