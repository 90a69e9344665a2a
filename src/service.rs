//! Owner of the current snapshot.
//!
//! A refresh runs fetch and transform to completion and then swaps the new
//! snapshot in. Failed refreshes keep the previous snapshot and clear the
//! availability flag. Readers clone an `Arc` and never see a partial table.

use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::config::PollenConfig;
use crate::error::{MalformedFeedError, RefreshError};
use crate::feed::RawPayload;
use crate::fetch::{HttpClient, fetch_feed};
use crate::region::RegionId;
use crate::snapshot::FeedSnapshot;
use crate::transform::transform;

#[derive(Debug, Default)]
struct State {
    snapshot: Option<Arc<FeedSnapshot>>,
    available: bool,
}

pub struct PollenService<C> {
    client: C,
    url: String,
    timeout: Duration,
    tracked: BTreeSet<RegionId>,
    state: RwLock<State>,
    refresh_lock: Mutex<()>,
}

impl<C: HttpClient> PollenService<C> {
    pub fn new(client: C, url: impl Into<String>, timeout: Duration, tracked: BTreeSet<RegionId>) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
            tracked,
            state: RwLock::new(State::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn from_config(client: C, config: &PollenConfig) -> Self {
        Self::new(client, config.url.clone(), config.timeout(), config.tracked_regions())
    }

    pub fn tracked_regions(&self) -> &BTreeSet<RegionId> {
        &self.tracked
    }

    /// Runs one fetch-transform cycle. Concurrent callers wait for the
    /// cycle in flight and then run their own.
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub async fn refresh(&self) -> Result<Arc<FeedSnapshot>, RefreshError> {
        let _guard = self.refresh_lock.lock().await;

        let payload = match fetch_feed(&self.client, &self.url, self.timeout).await {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Pollen feed fetch failed");
                self.mark_unavailable();
                return Err(e.into());
            }
        };

        Ok(self.ingest(&payload)?)
    }

    /// Transforms an already fetched payload and swaps it in.
    pub fn ingest(&self, payload: &RawPayload) -> Result<Arc<FeedSnapshot>, MalformedFeedError> {
        match transform(payload, &self.tracked) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                state.snapshot = Some(Arc::clone(&snapshot));
                state.available = true;
                info!(
                    last_update = %snapshot.last_update(),
                    regions = snapshot.regions().count(),
                    "Pollen snapshot updated"
                );
                Ok(snapshot)
            }
            Err(e) => {
                error!(error = %e, "Pollen feed rejected");
                self.mark_unavailable();
                Err(e)
            }
        }
    }

    fn mark_unavailable(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.snapshot.is_some() {
            warn!("Keeping previous pollen snapshot");
        }
        state.available = false;
    }

    /// Latest good snapshot, which may be stale when [`is_available`] is false.
    ///
    /// [`is_available`]: Self::is_available
    pub fn snapshot(&self) -> Option<Arc<FeedSnapshot>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .clone()
    }

    /// Whether the most recent refresh succeeded.
    pub fn is_available(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).available
    }

    pub fn last_update(&self) -> Option<NaiveDateTime> {
        self.snapshot().map(|s| s.last_update())
    }

    /// Refreshes every `interval` until `shutdown` fires. Failures are logged
    /// and retried on the next tick.
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<()>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh().await {
                        debug!(error = %e, "Refresh cycle failed, retrying next interval");
                    }
                }
                _ = shutdown.changed() => {
                    info!("Refresh loop shutting down");
                    break;
                }
            }
        }
    }
}
