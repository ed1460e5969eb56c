use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use crate::areas;
use crate::backend::{BackendApi, BackendClient};
use crate::config::{Config, ConfigError};
use crate::error::Result;
use crate::model::{AreaGroup, Asset, Province, SuburbEntry, SyncSnapshot};
use crate::provinces;
use crate::release::{ReleaseClient, ReleaseFeed};

type InFlightSync = Shared<BoxFuture<'static, Result<Arc<SyncSnapshot>>>>;

/// Composition root for the sync core. Constructed once per process and
/// handed to consumers; the collaborators are injected, never global.
pub struct SyncService {
    release: Arc<dyn ReleaseFeed>,
    backend: Arc<dyn BackendApi>,
    latest: Arc<RwLock<Option<Arc<SyncSnapshot>>>>,
    in_flight: Mutex<Option<InFlightSync>>,
}

impl SyncService {
    pub fn new(release: Arc<dyn ReleaseFeed>, backend: Arc<dyn BackendApi>) -> Self {
        Self {
            release,
            backend,
            latest: Arc::new(RwLock::new(None)),
            in_flight: Mutex::new(None),
        }
    }

    pub fn from_config(cfg: &Config) -> std::result::Result<Self, ConfigError> {
        let timeout = Duration::from_secs(cfg.http.timeout_secs);
        let release = ReleaseClient::new(cfg.release_url()?, timeout);
        let backend = BackendClient::new(
            cfg.backend_url()?,
            timeout,
            cfg.paging.initial_page_size,
            cfg.paging.page_size,
        );
        Ok(Self::new(Arc::new(release), Arc::new(backend)))
    }

    /// The static province catalog.
    pub fn list_provinces(&self) -> &'static [Province] {
        provinces::all()
    }

    /// The last successful sync result, if any. A failed sync never clears
    /// or replaces this.
    pub async fn snapshot(&self) -> Option<Arc<SyncSnapshot>> {
        self.latest.read().await.clone()
    }

    /// Fetch both upstream views concurrently and join them.
    ///
    /// At most one sync is in flight per process: a concurrent second call
    /// awaits the first's shared outcome instead of issuing duplicate
    /// requests. A failure in either branch fails the join, but the other
    /// branch runs to completion first; both are idempotent reads.
    #[instrument(skip_all)]
    pub async fn sync_all(&self) -> Result<Arc<SyncSnapshot>> {
        let fut = {
            let mut slot = self.in_flight.lock().await;
            match slot.as_ref() {
                Some(fut) => {
                    debug!("joining in-flight sync");
                    fut.clone()
                }
                None => {
                    let release = Arc::clone(&self.release);
                    let backend = Arc::clone(&self.backend);
                    let latest = Arc::clone(&self.latest);
                    let fut: InFlightSync = async move {
                        let (assets, records) = tokio::join!(
                            release.fetch_latest_assets(),
                            backend.fetch_all_records()
                        );
                        let snapshot = Arc::new(SyncSnapshot {
                            assets: assets?,
                            records: records?,
                        });
                        info!(
                            assets = snapshot.assets.len(),
                            records = snapshot.records.len(),
                            "sync complete"
                        );
                        *latest.write().await = Some(Arc::clone(&snapshot));
                        Ok(snapshot)
                    }
                    .boxed()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };

        let outcome = fut.clone().await;

        let mut slot = self.in_flight.lock().await;
        if slot.as_ref().map_or(false, |held| held.ptr_eq(&fut)) {
            *slot = None;
        }
        outcome
    }

    /// Distinct areas within a province, straight from the backend. An empty
    /// list is a valid zero-result.
    #[instrument(skip_all, fields(province = key))]
    pub async fn areas_for_province(&self, key: &str) -> Result<Vec<AreaGroup>> {
        self.backend.distinct_areas(key).await
    }

    /// Resolve an area name to its calendar asset: the synced asset list
    /// first, then the backend lookup. `None` is "no selection", not a
    /// failure.
    #[instrument(skip_all, fields(area = area_name))]
    pub async fn asset_for_area(&self, area_name: &str) -> Result<Option<Asset>> {
        if let Some(snapshot) = self.snapshot().await {
            if let Some(asset) = areas::find_by_area_name(&snapshot.assets, area_name) {
                return Ok(Some(asset.clone()));
            }
        }
        self.backend.asset_by_calendar_name(area_name).await
    }

    /// Suburbs covered by a calendar. An empty list is a valid zero-result.
    #[instrument(skip_all, fields(calendar = calendar_name))]
    pub async fn suburbs_for_area(&self, calendar_name: &str) -> Result<Vec<SuburbEntry>> {
        self.backend.suburbs(calendar_name).await
    }
}
