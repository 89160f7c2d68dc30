//! # Settings State
//!
//! Holds the latest business settings fetched from the backend.
//!
//! ## Refresh Semantics
//! The terminal starts on defaults (USD, zero tax, blank receipt text) and
//! replaces the whole value on each successful fetch. A failed fetch keeps
//! the previous value; stale settings beat no settings at the register.

use std::sync::RwLock;

use tracing::{debug, warn};

use meridian_client::{ApiClient, ClientResult};
use meridian_core::money::{Currency, TaxRate};
use meridian_core::types::BusinessSettings;

/// Refreshable holder for [`BusinessSettings`].
///
/// Read-mostly: flows read a snapshot per operation, only `refresh` writes.
#[derive(Debug)]
pub struct SettingsState {
    inner: RwLock<BusinessSettings>,
}

impl SettingsState {
    /// Creates settings state with defaults until the first fetch lands.
    pub fn new() -> Self {
        SettingsState {
            inner: RwLock::new(BusinessSettings::default()),
        }
    }

    /// Creates settings state seeded with a known value (tests, restores).
    pub fn with_settings(settings: BusinessSettings) -> Self {
        SettingsState {
            inner: RwLock::new(settings),
        }
    }

    /// Returns a snapshot of the current settings.
    pub fn snapshot(&self) -> BusinessSettings {
        self.inner
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Current tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        self.snapshot().tax_rate()
    }

    /// Current currency descriptor.
    pub fn currency(&self) -> Currency {
        self.snapshot().currency()
    }

    /// Replaces the held settings.
    pub fn update(&self, settings: BusinessSettings) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = settings;
        }
    }

    /// Fetches fresh settings from the backend and installs them.
    ///
    /// On failure the previous value stays in place and the error is
    /// returned for the caller to decide whether it matters.
    pub async fn refresh(&self, client: &ApiClient) -> ClientResult<()> {
        match client.settings().business().await {
            Ok(settings) => {
                debug!(
                    currency = %settings.currency,
                    tax_rate = settings.tax_rate,
                    "business settings refreshed"
                );
                self.update(settings);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "settings refresh failed, keeping previous values");
                Err(e)
            }
        }
    }
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_until_updated() {
        let state = SettingsState::new();
        assert_eq!(state.currency().code, "USD");
        assert!(state.tax_rate().is_zero());

        state.update(BusinessSettings {
            currency: "UZS".to_string(),
            tax_rate: 12.0,
            ..BusinessSettings::default()
        });

        assert_eq!(state.currency().code, "UZS");
        assert_eq!(state.tax_rate().bps(), 1200);
    }
}
