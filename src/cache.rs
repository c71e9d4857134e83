use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::fetcher::Fetcher;
use crate::model::Snapshot;

/// How long a snapshot is served before the next request refreshes it.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct CachedSnapshot {
    snapshot: Arc<Snapshot>,
    fetched_at: Instant,
}

/// Time-bounded cache in front of the fetcher.
///
/// A fresh snapshot is returned without touching the network. A stale one
/// triggers a synchronous refresh; concurrent callers that find the cache
/// stale wait for that single refresh instead of starting their own.
pub struct CacheGate {
    inner: Arc<GateState>,
}

struct GateState {
    fetcher: Fetcher,
    ttl: Duration,
    state: RwLock<Option<CachedSnapshot>>,
    refresh_lock: Mutex<()>,
}

impl CacheGate {
    pub fn new(fetcher: Fetcher, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(GateState {
                fetcher,
                ttl,
                state: RwLock::new(None),
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    pub async fn get_snapshot(&self, sources: &[String]) -> Arc<Snapshot> {
        if let Some(snapshot) = self.inner.fresh().await {
            return snapshot;
        }

        // The refresh owns the lock in its own task, so a caller that goes
        // away mid-refresh cannot release it before the snapshot is stored.
        let inner = self.inner.clone();
        let sources = sources.to_vec();
        match tokio::spawn(async move { inner.refresh(&sources).await }).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Refresh task failed");
                self.current().await
            }
        }
    }

    /// The stored snapshot regardless of age, without refreshing.
    pub async fn current(&self) -> Arc<Snapshot> {
        self.inner
            .state
            .read()
            .await
            .as_ref()
            .map(|cached| cached.snapshot.clone())
            .unwrap_or_else(|| Arc::new(Snapshot::empty()))
    }
}

impl GateState {
    async fn refresh(&self, sources: &[String]) -> Arc<Snapshot> {
        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited for the lock
        if let Some(snapshot) = self.fresh().await {
            debug!("Refresh completed by a concurrent request");
            return snapshot;
        }

        let snapshot = Arc::new(self.fetcher.fetch_all(sources).await);

        let mut state = self.state.write().await;
        *state = Some(CachedSnapshot {
            snapshot: snapshot.clone(),
            fetched_at: Instant::now(),
        });

        snapshot
    }

    async fn fresh(&self) -> Option<Arc<Snapshot>> {
        let state = self.state.read().await;
        let cached = state.as_ref()?;

        let elapsed = cached.fetched_at.elapsed();
        if elapsed < self.ttl {
            info!(
                "It has been {}s since last fetching so returning cached feeds",
                elapsed.as_secs()
            );
            Some(cached.snapshot.clone())
        } else {
            None
        }
    }
}
