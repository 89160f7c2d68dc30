//! # API Client
//!
//! Typed access to the backend, grouped by endpoint family.
//!
//! ## Usage
//! ```rust,no_run
//! use meridian_client::{ApiClient, ClientConfig};
//!
//! # async fn example() -> Result<(), meridian_client::ClientError> {
//! let client = ApiClient::new(&ClientConfig::new("https://api.example.com/api").with_token("jwt"))?;
//!
//! // Exact lookup during search
//! let variant = client.variants().by_sku("DJ-001").await?;
//!
//! // Cache population
//! let corpus = client.products().list_variants().await?;
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use meridian_core::types::{BusinessSettings, ProductVariant, Store, Transaction};

use crate::error::ClientResult;
use crate::http::{ClientConfig, HttpClient};
use crate::types::{flatten_variants, NewTransaction, ProductRecord, VariantRecord};

// =============================================================================
// API Client
// =============================================================================

/// The backend API client. Cheap to clone; endpoint groups borrow it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
}

impl ApiClient {
    /// Creates a new API client.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(ApiClient {
            http: HttpClient::new(config)?,
        })
    }

    /// Product listing operations.
    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi { http: &self.http }
    }

    /// Exact variant lookups.
    pub fn variants(&self) -> VariantsApi<'_> {
        VariantsApi { http: &self.http }
    }

    /// Sale creation.
    pub fn transactions(&self) -> TransactionsApi<'_> {
        TransactionsApi { http: &self.http }
    }

    /// Store listing.
    pub fn stores(&self) -> StoresApi<'_> {
        StoresApi { http: &self.http }
    }

    /// Business settings.
    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi { http: &self.http }
    }
}

// =============================================================================
// Products
// =============================================================================

/// Operations on the products listing.
#[derive(Debug)]
pub struct ProductsApi<'a> {
    http: &'a HttpClient,
}

impl ProductsApi<'_> {
    /// Fetches the full products listing with embedded variants.
    pub async fn list(&self) -> ClientResult<Vec<ProductRecord>> {
        self.http.get("products").await
    }

    /// Fetches the listing and flattens it into the denormalized variant
    /// corpus the search cache holds.
    pub async fn list_variants(&self) -> ClientResult<Vec<ProductVariant>> {
        let products = self.list().await?;
        let variants = flatten_variants(products);
        debug!(count = variants.len(), "flattened variant corpus");
        Ok(variants)
    }
}

// =============================================================================
// Variants
// =============================================================================

/// Exact-match variant lookups. 404 surfaces as `ClientError::NotFound`,
/// which the search chain treats as a soft miss.
#[derive(Debug)]
pub struct VariantsApi<'a> {
    http: &'a HttpClient,
}

impl VariantsApi<'_> {
    /// Looks up a variant by its exact SKU.
    pub async fn by_sku(&self, sku: &str) -> ClientResult<ProductVariant> {
        let record: VariantRecord = self.http.get(&format!("variants/sku/{}", sku)).await?;
        Ok(record.into_variant(None))
    }

    /// Looks up a variant by its exact barcode.
    pub async fn by_barcode(&self, barcode: &str) -> ClientResult<ProductVariant> {
        let record: VariantRecord = self
            .http
            .get(&format!("variants/barcode/{}", barcode))
            .await?;
        Ok(record.into_variant(None))
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// Sale submission.
#[derive(Debug)]
pub struct TransactionsApi<'a> {
    http: &'a HttpClient,
}

impl TransactionsApi<'_> {
    /// Creates a sale and returns the persisted transaction.
    ///
    /// The request's idempotency key makes the retry-once transport policy
    /// safe: a duplicate delivery records nothing new.
    pub async fn create(&self, request: &NewTransaction) -> ClientResult<Transaction> {
        debug!(
            store_id = %request.store_id,
            items = request.items.len(),
            idempotency_key = %request.idempotency_key,
            "submitting transaction"
        );
        self.http.post("transactions", request).await
    }
}

// =============================================================================
// Stores
// =============================================================================

/// Store listing for the store selector.
#[derive(Debug)]
pub struct StoresApi<'a> {
    http: &'a HttpClient,
}

impl StoresApi<'_> {
    /// Fetches all stores.
    pub async fn list(&self) -> ClientResult<Vec<Store>> {
        self.http.get("stores").await
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Business settings owned by the backend.
#[derive(Debug)]
pub struct SettingsApi<'a> {
    http: &'a HttpClient,
}

impl SettingsApi<'_> {
    /// Fetches the business-wide settings (currency, tax rate, receipt text).
    pub async fn business(&self) -> ClientResult<BusinessSettings> {
        self.http.get("settings/business").await
    }
}
