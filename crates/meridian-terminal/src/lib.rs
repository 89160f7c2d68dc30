//! # Meridian Terminal Library
//!
//! The POS session layer a UI shell embeds. Wires every state object with
//! explicit ownership: construct with [`PosTerminal::start`], operate
//! through the exposed flows, tear down with [`PosTerminal::shutdown`].
//!
//! ## Module Organization
//! ```text
//! meridian_terminal/
//! ├── lib.rs          ◄─── You are here (config, lifecycle, tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart state (Arc<Mutex<Cart>>)
//! │   ├── settings.rs ◄─── Business settings holder
//! │   └── session.rs  ◄─── Authenticated session context
//! ├── cache.rs        ◄─── Variant cache + background refresher
//! ├── search.rs       ◄─── Debounced multi-strategy search
//! ├── checkout.rs     ◄─── Payment flow state machine
//! ├── receipt.rs      ◄─── Receipt document builder/renderer
//! ├── events.rs       ◄─── Notification seam (EventSink)
//! └── error.rs        ◄─── User-facing error type
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Terminal Startup                                  │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: INFO, can be overridden with RUST_LOG                    │
//! │                                                                         │
//! │  2. Build API Client ─────────────────────────────────────────────────► │
//! │     • Base URL + bearer token from TerminalConfig                       │
//! │                                                                         │
//! │  3. Fetch Business Settings ──────────────────────────────────────────► │
//! │     • Currency, tax rate, receipt text                                  │
//! │     • Defaults stay in place if the fetch fails                         │
//! │                                                                         │
//! │  4. Spawn Cache Refresher ────────────────────────────────────────────► │
//! │     • First tick populates the variant corpus immediately               │
//! │     • Then every refresh interval (default 60s)                         │
//! │                                                                         │
//! │  5. Wire Flows ───────────────────────────────────────────────────────► │
//! │     • CartState, SearchState, CheckoutFlow share the session            │
//! │     • Everything is dependency-injected; no globals                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod checkout;
pub mod error;
pub mod events;
pub mod receipt;
pub mod search;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use meridian_client::{ApiClient, ClientConfig};
use meridian_core::cart::StockPolicy;
use meridian_core::types::{Store, User};

use cache::{CacheRefresher, VariantCache, DEFAULT_REFRESH_INTERVAL};
use checkout::CheckoutFlow;
use error::TerminalError;
use events::EventSink;
use search::{ExactLookup, SearchState, SEARCH_DEBOUNCE};
use state::{CartState, SessionContext, SettingsState};

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Terminal configuration resolved at startup.
///
/// ## Environment Variables
/// - `MERIDIAN_API_URL`: backend base URL
/// - `MERIDIAN_API_TOKEN`: bearer token for the session
/// - `MERIDIAN_CACHE_REFRESH_SECS`: variant cache refresh interval
/// - `MERIDIAN_SEARCH_DEBOUNCE_MS`: search quiet window
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Backend base URL, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,

    /// Bearer token from the authenticated session.
    pub api_token: Option<String>,

    /// How often the variant cache re-pulls the products listing.
    pub cache_refresh_interval: Duration,

    /// Quiet window after the last keystroke before a lookup runs.
    pub search_debounce: Duration,

    /// Stock enforcement behavior for the cart.
    pub stock_policy: StockPolicy,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            api_base_url: "http://localhost:5000/api".to_string(),
            api_token: None,
            cache_refresh_interval: DEFAULT_REFRESH_INTERVAL,
            search_debounce: SEARCH_DEBOUNCE,
            stock_policy: StockPolicy::default(),
        }
    }
}

impl TerminalConfig {
    /// Creates a configuration from environment variables and defaults.
    pub fn from_env() -> Self {
        let mut config = TerminalConfig::default();

        if let Ok(url) = std::env::var("MERIDIAN_API_URL") {
            config.api_base_url = url;
        }

        if let Ok(token) = std::env::var("MERIDIAN_API_TOKEN") {
            config.api_token = Some(token);
        }

        if let Ok(secs) = std::env::var("MERIDIAN_CACHE_REFRESH_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.cache_refresh_interval = Duration::from_secs(secs);
            }
        }

        if let Ok(ms) = std::env::var("MERIDIAN_SEARCH_DEBOUNCE_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                config.search_debounce = Duration::from_millis(ms);
            }
        }

        config
    }
}

// =============================================================================
// Terminal Aggregate
// =============================================================================

/// One running POS terminal session.
///
/// Owns every state object and the background refresher. Dropping without
/// [`PosTerminal::shutdown`] aborts nothing; call shutdown for a clean stop.
pub struct PosTerminal {
    client: ApiClient,
    session: Arc<SessionContext>,
    settings: Arc<SettingsState>,
    cache: Arc<VariantCache>,
    cart: CartState,
    search: SearchState,
    checkout: CheckoutFlow,
    refresher: Option<CacheRefresher>,
}

impl PosTerminal {
    /// Builds and starts a terminal session for an authenticated user.
    ///
    /// Must be called within a tokio runtime; spawns the cache refresher.
    pub async fn start(
        config: &TerminalConfig,
        user: User,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, TerminalError> {
        info!(user_id = %user.id, role = ?user.role, "starting POS terminal");

        let mut client_config = ClientConfig::new(config.api_base_url.clone());
        if let Some(token) = &config.api_token {
            client_config = client_config.with_token(token.clone());
        }
        let client = ApiClient::new(&client_config)?;

        let session = Arc::new(SessionContext::new(user));

        // Settings: defaults stand in until the backend answers
        let settings = Arc::new(SettingsState::new());
        if let Err(e) = settings.refresh(&client).await {
            warn!(error = %e, "starting with default business settings");
        }

        // Cache: the refresher's first tick populates it immediately
        let cache = Arc::new(VariantCache::new());
        let refresher = CacheRefresher::spawn(
            cache.clone(),
            client.clone(),
            config.cache_refresh_interval,
        );

        let cart = CartState::with_policy(config.stock_policy);

        let search = SearchState::with_debounce(
            Arc::new(client.clone()) as Arc<dyn ExactLookup>,
            cache.clone(),
            config.search_debounce,
        );

        let checkout = CheckoutFlow::new(
            Arc::new(client.clone()),
            cart.clone(),
            settings.clone(),
            session.clone(),
            events,
        );

        info!("POS terminal started");

        Ok(PosTerminal {
            client,
            session,
            settings,
            cache,
            cart,
            search,
            checkout,
            refresher: Some(refresher),
        })
    }

    /// The session context (user, role, store selection).
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// The business settings holder.
    pub fn settings(&self) -> &Arc<SettingsState> {
        &self.settings
    }

    /// The variant cache.
    pub fn cache(&self) -> &Arc<VariantCache> {
        &self.cache
    }

    /// The active cart.
    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    /// The search state.
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// The checkout flow.
    pub fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    /// Fetches the store list for the store selector.
    pub async fn stores(&self) -> Result<Vec<Store>, TerminalError> {
        Ok(self.client.stores().list().await?)
    }

    /// Stops the background refresher and tears the session down.
    pub async fn shutdown(mut self) {
        if let Some(refresher) = self.refresher.take() {
            refresher.shutdown().await;
        }
        info!("POS terminal stopped");
    }
}

// =============================================================================
// Tracing Setup
// =============================================================================

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=meridian=trace` - Show trace for meridian crates only
/// - Default: INFO level
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,meridian=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TerminalConfig::default();
        assert_eq!(config.cache_refresh_interval, Duration::from_secs(60));
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.stock_policy, StockPolicy::DeferToBackend);
    }
}
