use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, SyncError};
use crate::model::{AreaGroup, Asset, MachinePage, MachineRecord, SuburbEntry};

/// Client for the machine-friendly calendar backend.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
    initial_page_size: u64,
    page_size: u64,
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Seam over the backend API so the facade can be exercised against mocks.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Drain the paged machine-friendly feed until the cursor reports
    /// completion. All pages or nothing.
    async fn fetch_all_records(&self) -> Result<Vec<MachineRecord>>;

    /// Distinct areas matching the given name fragment. Empty is a valid
    /// zero-result, not an error.
    async fn distinct_areas(&self, area_name: &str) -> Result<Vec<AreaGroup>>;

    /// Asset metadata for a calendar name, if the backend knows it.
    async fn asset_by_calendar_name(&self, calendar_name: &str) -> Result<Option<Asset>>;

    /// Suburbs covered by a calendar. Empty is a valid zero-result.
    async fn suburbs(&self, calendar_name: &str) -> Result<Vec<SuburbEntry>>;
}

impl BackendClient {
    /// `base_url` must end with a slash so endpoint names join onto it;
    /// `Config::backend_url` guarantees that.
    pub fn new(base_url: Url, timeout: Duration, initial_page_size: u64, page_size: u64) -> Self {
        let http = Client::builder()
            .user_agent("shedsync/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url,
            timeout,
            initial_page_size,
            page_size,
        }
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        self.base_url
            .join(name)
            .map_err(|err| SyncError::ProtocolViolation(format!("invalid endpoint {name}: {err}")))
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.endpoint(endpoint)?;
        let res = self
            .http
            .get(url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SyncError::UpstreamUnavailable {
                status: Some(status.as_u16()),
                message: body,
            });
        }
        Ok(res)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        Ok(self.get(endpoint, query).await?.json().await?)
    }

    async fn fetch_page(&self, last_record: u64, count: u64) -> Result<MachinePage> {
        debug!(last_record, count, "fetching machine feed page");
        let page: MachinePage = self
            .get_json(
                "GetMachineFriendlyInfo",
                &[
                    ("lastRecord", last_record.to_string()),
                    ("recordsToRetrieve", count.to_string()),
                ],
            )
            .await?;
        if page.last_record > page.total_records {
            return Err(SyncError::ProtocolViolation(format!(
                "cursor {} beyond reported total {}",
                page.last_record, page.total_records
            )));
        }
        Ok(page)
    }

    /// Sequential by protocol: each page's request depends on the previous
    /// cursor, so round trips dominate latency and page size is the tuning
    /// knob. Termination is strictly `last_record == total_records`.
    pub async fn fetch_all_records(&self) -> Result<Vec<MachineRecord>> {
        let mut records = Vec::new();
        let mut page = self.fetch_page(0, self.initial_page_size).await?;
        loop {
            let cursor = page.last_record;
            records.extend(page.data);
            if cursor == page.total_records {
                debug!(total = records.len(), "machine feed complete");
                return Ok(records);
            }
            page = self.fetch_page(cursor, self.page_size).await?;
            if page.last_record == cursor {
                // An unchanged cursor would loop forever.
                return Err(SyncError::ProtocolViolation(format!(
                    "pagination cursor stuck at {cursor}"
                )));
            }
        }
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn fetch_all_records(&self) -> Result<Vec<MachineRecord>> {
        BackendClient::fetch_all_records(self).await
    }

    async fn distinct_areas(&self, area_name: &str) -> Result<Vec<AreaGroup>> {
        self.get_json("GetDistinctAreas", &[("areaName", area_name.to_string())])
            .await
    }

    async fn asset_by_calendar_name(&self, calendar_name: &str) -> Result<Option<Asset>> {
        self.get_json(
            "GetAssetByCalendarName",
            &[("calendarname", calendar_name.to_string())],
        )
        .await
    }

    async fn suburbs(&self, calendar_name: &str) -> Result<Vec<SuburbEntry>> {
        self.get_json(
            "GetCalendarSuburbs",
            &[("calendarName", calendar_name.to_string())],
        )
        .await
    }
}
