//! # POS Search
//!
//! Debounced, multi-strategy product lookup for the POS screen.
//!
//! ## Lookup Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Search Flow (per keystroke)                          │
//! │                                                                         │
//! │  set_query("AB12")                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bump generation ──► empty query? clear results, stop                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sleep 300ms ──► superseded? (generation moved) ──► drop silently       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  len ≥ 2:  GET /variants/sku/{q}      hit ──► [variant], stop           │
//! │            GET /variants/barcode/{q}  hit ──► [variant], stop           │
//! │       │         (misses and transport errors fall through)              │
//! │       ▼                                                                 │
//! │  fuzzy-rank the cached corpus, take top 10                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  still the latest generation? ──► publish results                       │
//! │            otherwise ────────────► drop stale response                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The generation counter is checked both after the debounce sleep and again
//! before publishing, so neither a stale timer nor a slow network response
//! can overwrite results for a newer query.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use meridian_client::{ApiClient, ClientResult};
use meridian_core::search::rank_variants;
use meridian_core::types::ProductVariant;
use meridian_core::validation::validate_search_query;

use crate::cache::VariantCache;

/// Quiet window after the last keystroke before a lookup runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries shorter than this skip the remote exact-match strategies.
pub const MIN_REMOTE_QUERY_LEN: usize = 2;

// =============================================================================
// Exact Lookup Seam
// =============================================================================

/// Remote exact-match lookups, abstracted so the search flow is testable
/// without a backend.
///
/// A miss is `Ok(None)`, not an error; only transport-level failures are
/// `Err`.
#[async_trait]
pub trait ExactLookup: Send + Sync {
    /// Exact SKU lookup.
    async fn by_sku(&self, sku: &str) -> ClientResult<Option<ProductVariant>>;

    /// Exact barcode lookup.
    async fn by_barcode(&self, barcode: &str) -> ClientResult<Option<ProductVariant>>;
}

#[async_trait]
impl ExactLookup for ApiClient {
    async fn by_sku(&self, sku: &str) -> ClientResult<Option<ProductVariant>> {
        match self.variants().by_sku(sku).await {
            Ok(variant) => Ok(Some(variant)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn by_barcode(&self, barcode: &str) -> ClientResult<Option<ProductVariant>> {
        match self.variants().by_barcode(barcode).await {
            Ok(variant) => Ok(Some(variant)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// =============================================================================
// Strategy Chain
// =============================================================================

/// Runs the exact-then-fuzzy strategy chain for one query.
///
/// Remote strategies fail soft: a transport error is logged and the chain
/// moves on, so the register keeps searching the cached corpus even with
/// the network down.
pub async fn resolve(
    query: &str,
    lookup: &dyn ExactLookup,
    corpus: &[ProductVariant],
) -> Vec<ProductVariant> {
    if query.len() >= MIN_REMOTE_QUERY_LEN {
        match lookup.by_sku(query).await {
            Ok(Some(variant)) => return vec![variant],
            Ok(None) => {}
            Err(e) => warn!(query = %query, error = %e, "exact SKU lookup failed"),
        }

        match lookup.by_barcode(query).await {
            Ok(Some(variant)) => return vec![variant],
            Ok(None) => {}
            Err(e) => warn!(query = %query, error = %e, "exact barcode lookup failed"),
        }
    }

    rank_variants(query, corpus)
}

// =============================================================================
// Search State
// =============================================================================

/// Per-screen search state: the live query, the published results, and the
/// debounce/generation machinery. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SearchState {
    inner: Arc<SearchInner>,
}

struct SearchInner {
    query: Mutex<String>,
    results: Mutex<Vec<ProductVariant>>,
    searching: AtomicBool,
    generation: AtomicU64,
    lookup: Arc<dyn ExactLookup>,
    cache: Arc<VariantCache>,
    debounce: Duration,
}

impl SearchState {
    /// Creates search state with the default debounce window.
    pub fn new(lookup: Arc<dyn ExactLookup>, cache: Arc<VariantCache>) -> Self {
        Self::with_debounce(lookup, cache, SEARCH_DEBOUNCE)
    }

    /// Creates search state with an explicit debounce window.
    pub fn with_debounce(
        lookup: Arc<dyn ExactLookup>,
        cache: Arc<VariantCache>,
        debounce: Duration,
    ) -> Self {
        SearchState {
            inner: Arc::new(SearchInner {
                query: Mutex::new(String::new()),
                results: Mutex::new(Vec::new()),
                searching: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                lookup,
                cache,
                debounce,
            }),
        }
    }

    /// The current query text.
    pub fn query(&self) -> String {
        self.inner.query.lock().expect("Search mutex poisoned").clone()
    }

    /// The currently published results.
    pub fn results(&self) -> Vec<ProductVariant> {
        self.inner
            .results
            .lock()
            .expect("Search mutex poisoned")
            .clone()
    }

    /// Whether a lookup is in flight.
    pub fn is_searching(&self) -> bool {
        self.inner.searching.load(Ordering::SeqCst)
    }

    /// Clears query and results and invalidates any pending lookup.
    ///
    /// Called when a result is picked (the box resets) or the screen closes.
    pub fn clear(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.query.lock().expect("Search mutex poisoned").clear();
        self.inner
            .results
            .lock()
            .expect("Search mutex poisoned")
            .clear();
        self.inner.searching.store(false, Ordering::SeqCst);
    }

    /// Handles a keystroke: updates the query and schedules the debounced
    /// lookup.
    ///
    /// Returns the scheduled task handle so callers (and tests) can await
    /// the resolution; the UI shell typically ignores it.
    pub fn set_query(&self, raw: &str) -> JoinHandle<()> {
        let query = match validate_search_query(raw) {
            Ok(query) => query,
            Err(e) => {
                debug!(error = %e, "rejecting search query");
                self.clear();
                return tokio::spawn(async {});
            }
        };

        *self.inner.query.lock().expect("Search mutex poisoned") = query.clone();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Empty query clears immediately, no debounce, no network
        if query.is_empty() {
            self.inner
                .results
                .lock()
                .expect("Search mutex poisoned")
                .clear();
            self.inner.searching.store(false, Ordering::SeqCst);
            return tokio::spawn(async {});
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;

            // A newer keystroke restarted the quiet window
            if inner.generation.load(Ordering::SeqCst) != generation {
                return;
            }

            inner.searching.store(true, Ordering::SeqCst);
            let corpus = inner.cache.snapshot().await;
            let results = resolve(&query, inner.lookup.as_ref(), &corpus).await;

            // The response may have lost the race to a newer query
            if inner.generation.load(Ordering::SeqCst) == generation {
                debug!(query = %query, count = results.len(), "search results published");
                *inner.results.lock().expect("Search mutex poisoned") = results;
                inner.searching.store(false, Ordering::SeqCst);
            } else {
                debug!(query = %query, "discarding stale search response");
            }
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meridian_client::ClientError;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    fn variant(id: &str, sku: &str, barcode: Option<&str>, name: &str) -> ProductVariant {
        ProductVariant {
            id: id.to_string(),
            product_id: format!("p-{}", id),
            product_name: name.to_string(),
            sku: sku.to_string(),
            barcode: barcode.map(str::to_string),
            size: None,
            color: None,
            cost_price_cents: 100,
            selling_price_cents: 250,
            stock_quantity: 10,
            low_stock_threshold: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// In-memory lookup with call counting.
    struct FakeLookup {
        by_sku: HashMap<String, ProductVariant>,
        by_barcode: HashMap<String, ProductVariant>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeLookup {
        fn new() -> Self {
            FakeLookup {
                by_sku: HashMap::new(),
                by_barcode: HashMap::new(),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn with_sku(mut self, v: ProductVariant) -> Self {
            self.by_sku.insert(v.sku.clone(), v);
            self
        }

        fn with_barcode(mut self, v: ProductVariant) -> Self {
            let code = v.barcode.clone().unwrap_or_default();
            self.by_barcode.insert(code, v);
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExactLookup for FakeLookup {
        async fn by_sku(&self, sku: &str) -> ClientResult<Option<ProductVariant>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::Server("backend down".to_string()));
            }
            Ok(self.by_sku.get(sku).cloned())
        }

        async fn by_barcode(&self, barcode: &str) -> ClientResult<Option<ProductVariant>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::Server("backend down".to_string()));
            }
            Ok(self.by_barcode.get(barcode).cloned())
        }
    }

    #[tokio::test]
    async fn test_exact_sku_wins_and_short_circuits() {
        let target = variant("v1", "AB12", None, "Widget");
        let lookup = FakeLookup::new().with_sku(target.clone());
        let corpus = vec![variant("v2", "AB12-RED", None, "Other")];

        let results = resolve("AB12", &lookup, &corpus).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "v1");
        assert_eq!(lookup.calls(), 1); // barcode never tried
    }

    #[tokio::test]
    async fn test_sku_miss_falls_to_barcode() {
        let target = variant("v1", "OTHER", Some("5449000000996"), "Cola");
        let lookup = FakeLookup::new().with_barcode(target.clone());

        let results = resolve("5449000000996", &lookup, &[]).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "v1");
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_both_misses_fall_to_fuzzy() {
        let lookup = FakeLookup::new();
        let corpus = vec![
            variant("fuzzy", "XAXBX1X2", None, "Other Thing"),
            variant("prefix", "AB12-RED", None, "Red Widget"),
        ];

        let results = resolve("AB12", &lookup, &corpus).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "prefix"); // exact-prefix outranks subsequence
    }

    #[tokio::test]
    async fn test_short_query_skips_remote() {
        let lookup = FakeLookup::new().with_sku(variant("v1", "A", None, "Widget"));
        let corpus = vec![variant("v2", "A-100", None, "Widget")];

        let results = resolve("A", &lookup, &corpus).await;
        assert_eq!(lookup.calls(), 0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "v2"); // fuzzy only
    }

    #[tokio::test]
    async fn test_transport_errors_fail_soft_to_cache() {
        let lookup = FakeLookup::new().failing();
        let corpus = vec![variant("v1", "AB12", None, "Widget")];

        // Backend down: the cached corpus still answers
        let results = resolve("AB12", &lookup, &corpus).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "v1");
    }

    #[tokio::test]
    async fn test_no_match_anywhere_yields_empty() {
        let lookup = FakeLookup::new();
        let results = resolve("ZZZZ", &lookup, &[]).await;
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_clears_without_lookup() {
        let lookup = Arc::new(FakeLookup::new());
        let cache = Arc::new(VariantCache::new());
        let state = SearchState::with_debounce(
            lookup.clone() as Arc<dyn ExactLookup>,
            cache,
            Duration::from_millis(300),
        );

        state.set_query("").await.unwrap();
        assert!(state.results().is_empty());
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_only_last_keystroke_resolves() {
        let lookup = Arc::new(
            FakeLookup::new()
                .with_sku(variant("first", "AB", None, "First"))
                .with_sku(variant("second", "AB12", None, "Second")),
        );
        let cache = Arc::new(VariantCache::new());
        let state = SearchState::with_debounce(
            lookup.clone() as Arc<dyn ExactLookup>,
            cache,
            Duration::from_millis(300),
        );

        // Two keystrokes inside one quiet window
        let first = state.set_query("AB");
        let second = state.set_query("AB12");

        first.await.unwrap();
        second.await.unwrap();

        let results = state.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "second");
        // The superseded timer never issued a lookup
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_invalidates_pending_lookup() {
        let lookup = Arc::new(FakeLookup::new().with_sku(variant("v1", "AB12", None, "Widget")));
        let cache = Arc::new(VariantCache::new());
        let state = SearchState::with_debounce(
            lookup.clone() as Arc<dyn ExactLookup>,
            cache,
            Duration::from_millis(300),
        );

        let pending = state.set_query("AB12");
        state.clear();
        pending.await.unwrap();

        assert!(state.results().is_empty());
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fuzzy_uses_cache_snapshot() {
        let lookup = Arc::new(FakeLookup::new());
        let cache = Arc::new(VariantCache::new());
        cache
            .install(vec![variant("v1", "AB12-RED", None, "Red Widget")])
            .await;

        let state = SearchState::with_debounce(
            lookup as Arc<dyn ExactLookup>,
            cache,
            Duration::from_millis(300),
        );

        state.set_query("AB12").await.unwrap();

        let results = state.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "v1");
        assert!(!state.is_searching());
    }
}
