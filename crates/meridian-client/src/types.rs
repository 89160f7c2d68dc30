//! # Wire Types
//!
//! DTOs that exist only at the HTTP boundary.
//!
//! ## Why DTOs?
//! - Decouples the backend's JSON shapes from the domain model
//! - The products listing embeds variants inside product objects; the
//!   terminal wants one flat denormalized variant list, so flattening
//!   happens here and nowhere else
//! - Requests carry fields the domain never stores (the idempotency key)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meridian_core::types::{PaymentMethod, ProductVariant, TransactionType};

// =============================================================================
// Response Envelope
// =============================================================================

/// Every backend response wraps its payload in this envelope.
///
/// ```json
/// { "success": true, "message": "...", "data": { ... }, "error": null }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Products Listing
// =============================================================================

/// A product as the listing endpoint returns it, variants embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

fn default_true() -> bool {
    true
}

/// A variant on the wire. Exact-match lookups embed a product summary so
/// the display name is available without a second request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    pub id: String,
    pub product_id: String,
    pub sku: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub product: Option<ProductRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal product summary embedded in variant responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: String,
    pub name: String,
}

impl VariantRecord {
    /// Converts into the denormalized domain variant.
    ///
    /// The product name comes from the owning product when flattening a
    /// listing, or from the embedded summary on exact-match responses.
    pub fn into_variant(self, product_name: Option<&str>) -> ProductVariant {
        let product_name = product_name
            .map(str::to_string)
            .or_else(|| self.product.as_ref().map(|p| p.name.clone()))
            .unwrap_or_default();

        ProductVariant {
            id: self.id,
            product_id: self.product_id,
            product_name,
            sku: self.sku,
            barcode: self.barcode,
            size: self.size,
            color: self.color,
            cost_price_cents: self.cost_price_cents,
            selling_price_cents: self.selling_price_cents,
            stock_quantity: self.stock_quantity,
            low_stock_threshold: self.low_stock_threshold,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Flattens a products listing into the denormalized variant corpus the
/// cache holds. Inactive products are skipped; their variants are not
/// sellable.
pub fn flatten_variants(products: Vec<ProductRecord>) -> Vec<ProductVariant> {
    products
        .into_iter()
        .filter(|p| p.is_active)
        .flat_map(|product| {
            let name = product.name;
            product
                .variants
                .into_iter()
                .map(move |v| v.into_variant(Some(name.as_str())))
        })
        .collect()
}

// =============================================================================
// Transaction Request
// =============================================================================

/// The sale creation request body for `POST /transactions`.
///
/// Carries a client-minted idempotency key so a transport-level retry can
/// never record the same sale twice (the endpoint deduplicates on it).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub store_id: String,
    pub cashier_id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub items: Vec<NewTransactionItem>,
    pub payment_method: PaymentMethod,
    pub amount_paid_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub idempotency_key: Uuid,
}

/// One line of a sale creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionItem {
    pub product_variant_id: String,
    pub quantity: i64,
    pub discount_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
