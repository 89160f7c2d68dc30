//! # Variant Cache
//!
//! The full denormalized variant corpus the fuzzy search falls back to.
//!
//! ## Refresh Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Variant Cache Lifecycle                             │
//! │                                                                         │
//! │  CacheRefresher task (tokio)                                            │
//! │  ──────────────────────────                                             │
//! │                                                                         │
//! │  tick (immediately, then every 60s) ──► GET /products                   │
//! │                                             │                           │
//! │                            ok: flatten ─────┤                           │
//! │                                             ▼                           │
//! │                                   REPLACE whole snapshot                │
//! │                                                                         │
//! │                            err: log, KEEP previous snapshot             │
//! │                                                                         │
//! │  shutdown signal ──► loop exits, task joins                             │
//! │                                                                         │
//! │  Consumers: cache.snapshot() clones an Arc, never blocks the writer     │
//! │  for longer than the pointer swap. No incremental sync; the whole       │
//! │  list is always replaced at once.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use meridian_client::{ApiClient, ClientResult};
use meridian_core::types::ProductVariant;

/// How often the refresher pulls the products listing.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

// =============================================================================
// Variant Cache
// =============================================================================

/// Snapshot holder for the flattened variant list.
///
/// Consumers get an `Arc` to an immutable vector; the refresh path is the
/// only writer and always replaces the entire list.
#[derive(Debug)]
pub struct VariantCache {
    variants: RwLock<Arc<Vec<ProductVariant>>>,
    refreshed_at: RwLock<Option<DateTime<Utc>>>,
}

impl VariantCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        VariantCache {
            variants: RwLock::new(Arc::new(Vec::new())),
            refreshed_at: RwLock::new(None),
        }
    }

    /// Returns the current snapshot. Cheap: clones an `Arc`, not the list.
    pub async fn snapshot(&self) -> Arc<Vec<ProductVariant>> {
        self.variants.read().await.clone()
    }

    /// Number of variants in the current snapshot.
    pub async fn len(&self) -> usize {
        self.variants.read().await.len()
    }

    /// True when nothing has been cached yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// When the snapshot was last replaced, if ever.
    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        *self.refreshed_at.read().await
    }

    /// Replaces the whole cached list.
    pub async fn install(&self, variants: Vec<ProductVariant>) {
        let count = variants.len();
        *self.variants.write().await = Arc::new(variants);
        *self.refreshed_at.write().await = Some(Utc::now());
        debug!(count, "variant cache snapshot replaced");
    }

    /// Pulls the products listing and replaces the snapshot.
    ///
    /// On failure the previous snapshot stays; search keeps working from
    /// slightly stale data.
    pub async fn refresh(&self, client: &ApiClient) -> ClientResult<usize> {
        let variants = client.products().list_variants().await?;
        let count = variants.len();
        self.install(variants).await;
        Ok(count)
    }
}

impl Default for VariantCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Cache Refresher
// =============================================================================

/// Background task that keeps a [`VariantCache`] warm.
///
/// The first tick fires immediately, so spawning also performs the initial
/// population.
pub struct CacheRefresher {
    task: JoinHandle<()>,
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheRefresher {
    /// Spawns the refresher loop. Must be called within a tokio runtime.
    pub fn spawn(cache: Arc<VariantCache>, client: ApiClient, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match cache.refresh(&client).await {
                            Ok(count) => debug!(count, "variant cache refreshed"),
                            Err(e) => {
                                warn!(error = %e, "variant cache refresh failed, keeping previous snapshot");
                            }
                        }
                    }

                    _ = shutdown_rx.recv() => {
                        info!("cache refresher received shutdown");
                        break;
                    }
                }
            }
        });

        CacheRefresher { task, shutdown_tx }
    }

    /// Stops the refresher and waits for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
