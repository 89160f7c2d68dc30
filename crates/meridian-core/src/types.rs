//! # Domain Types
//!
//! Core domain types used throughout Meridian POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductVariant  │   │   Transaction   │   │     Store       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  sku (business) │   │  transaction_no │   │  name           │       │
//! │  │  barcode        │   │  totals (cents) │   │  address block  │       │
//! │  │  prices (cents) │   │  items          │   │  phone          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    UserRole     │   │ PaymentMethod   │   │ TransactionType │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Owner          │   │  Cash           │   │  Sale           │       │
//! │  │  Manager        │   │  Card           │   │  Return         │       │
//! │  │  Cashier        │   │  MobilePayment  │   │  Refund         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Everything serializes camelCase to match the backend JSON contract, and
//! every monetary field is an integer count of minor units (`*_cents`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Currency, Money, TaxRate};

// =============================================================================
// Product Variant
// =============================================================================

/// A sellable unit: one size/color combination of a product.
///
/// Read-only from the POS core's perspective. Inventory management owns
/// creation and updates; the terminal caches variants in memory and replaces
/// the whole set on refresh.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Unique identifier.
    pub id: String,

    /// Owning product.
    pub product_id: String,

    /// Product display name, denormalized onto the variant so search and
    /// receipts never need a second lookup.
    pub product_name: String,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Optional size ("M", "42", ...).
    pub size: Option<String>,

    /// Optional color.
    pub color: Option<String>,

    /// Acquisition cost in minor units.
    pub cost_price_cents: i64,

    /// Selling price in minor units.
    pub selling_price_cents: i64,

    /// Units on hand.
    pub stock_quantity: i64,

    /// Stock level at or below which the variant counts as low-stock.
    pub low_stock_threshold: i64,

    /// When the variant was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the variant was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ProductVariant {
    /// Returns the selling price as a Money type.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Returns the cost price as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Checks whether the variant is at or below its low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.low_stock_threshold
    }

    /// Display label combining product name with size/color when present.
    ///
    /// ## Example
    /// "Denim Jacket (M, Blue)" or just "Denim Jacket".
    pub fn label(&self) -> String {
        let mut attrs: Vec<&str> = Vec::new();
        if let Some(size) = self.size.as_deref() {
            attrs.push(size);
        }
        if let Some(color) = self.color.as_deref() {
            attrs.push(color);
        }

        if attrs.is_empty() {
            self.product_name.clone()
        } else {
            format!("{} ({})", self.product_name, attrs.join(", "))
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// A physical retail location.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub email: Option<String>,
    pub is_active: bool,
}

// =============================================================================
// Users & Roles
// =============================================================================

/// Role assigned to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Business owner: full access.
    Owner,
    /// Store manager: operations plus reporting and team.
    Manager,
    /// Cashier: sales floor operations only.
    Cashier,
}

/// An authenticated user (cashier, manager, or owner).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    /// Store this user is pinned to, if any. Users without an assignment
    /// pick a store at the terminal.
    pub store_id: Option<String>,
    pub is_active: bool,
}

impl User {
    /// Full display name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash; requires a tendered amount and may produce change.
    Cash,
    /// Card terminal; charged exactly the total.
    Card,
    /// Mobile wallet / QR payment; charged exactly the total.
    MobilePayment,
}

impl PaymentMethod {
    /// Human-readable label for receipts.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::MobilePayment => "MOBILE PAYMENT",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Transaction Type
// =============================================================================

/// Kind of transaction recorded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Sale,
    Return,
    Refund,
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::Sale
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// The authoritative persisted sale as returned by the backend.
///
/// The terminal never computes these numbers back; they are used verbatim for
/// receipt rendering and cache invalidation signaling.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Human-readable receipt number assigned server-side.
    pub transaction_no: String,
    #[serde(rename = "type", default)]
    pub transaction_type: TransactionType,
    pub store_id: String,
    pub cashier_id: String,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub amount_paid_cents: i64,
    pub change_cents: i64,
    #[serde(default)]
    pub items: Vec<TransactionItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the tendered amount as Money.
    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_cents(self.amount_paid_cents)
    }

    /// Returns the change due as Money.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

/// A persisted line item inside a [`Transaction`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub id: String,
    pub product_variant_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub discount_cents: i64,
    pub subtotal_cents: i64,
}

// =============================================================================
// Business Settings
// =============================================================================

/// Business-wide settings owned by the backend settings endpoint.
///
/// The terminal holds the latest fetched copy and falls back to these
/// defaults until the first successful fetch.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettings {
    #[serde(default)]
    pub business_name: String,

    /// ISO 4217 currency code ("USD", "UZS", ...).
    #[serde(default = "default_currency_code")]
    pub currency: String,

    /// Sales tax rate as a percentage (10 means 10%).
    #[serde(default)]
    pub tax_rate: f64,

    /// Free text printed above the store block on receipts.
    #[serde(default)]
    pub receipt_header: String,

    /// Free text printed at the bottom of receipts.
    #[serde(default)]
    pub receipt_footer: String,

    /// Whether completed sales print without asking.
    #[serde(default)]
    pub auto_print_receipt: bool,

    /// Pre-selected payment method in the payment modal.
    #[serde(default)]
    pub default_payment_method: PaymentMethod,

    /// Business-wide fallback low-stock threshold.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_low_stock_threshold() -> i64 {
    10
}

impl BusinessSettings {
    /// Returns the configured tax rate in basis points.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_percentage(self.tax_rate)
    }

    /// Returns the configured currency descriptor.
    #[inline]
    pub fn currency(&self) -> Currency {
        Currency::from_code(&self.currency)
    }
}

impl Default for BusinessSettings {
    fn default() -> Self {
        BusinessSettings {
            business_name: String::new(),
            currency: default_currency_code(),
            tax_rate: 0.0,
            receipt_header: String::new(),
            receipt_footer: String::new(),
            auto_print_receipt: false,
            default_payment_method: PaymentMethod::Cash,
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn variant() -> ProductVariant {
        ProductVariant {
            id: "v1".to_string(),
            product_id: "p1".to_string(),
            product_name: "Denim Jacket".to_string(),
            sku: "DJ-001".to_string(),
            barcode: None,
            size: Some("M".to_string()),
            color: Some("Blue".to_string()),
            cost_price_cents: 2500,
            selling_price_cents: 4999,
            stock_quantity: 3,
            low_stock_threshold: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_variant_label() {
        let v = variant();
        assert_eq!(v.label(), "Denim Jacket (M, Blue)");

        let mut plain = variant();
        plain.size = None;
        plain.color = None;
        assert_eq!(plain.label(), "Denim Jacket");
    }

    #[test]
    fn test_variant_low_stock() {
        let v = variant();
        assert!(v.is_low_stock());

        let mut stocked = variant();
        stocked.stock_quantity = 50;
        assert!(!stocked.is_low_stock());
    }

    #[test]
    fn test_payment_method_wire_format() {
        let json = serde_json::to_string(&PaymentMethod::MobilePayment).unwrap();
        assert_eq!(json, "\"MOBILE_PAYMENT\"");

        let parsed: PaymentMethod = serde_json::from_str("\"CASH\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Cash);
    }

    #[test]
    fn test_user_role_wire_format() {
        let json = serde_json::to_string(&UserRole::Owner).unwrap();
        assert_eq!(json, "\"OWNER\"");
    }

    #[test]
    fn test_business_settings_defaults() {
        let settings = BusinessSettings::default();
        assert_eq!(settings.currency, "USD");
        assert!(settings.tax_rate().is_zero());
        assert_eq!(settings.low_stock_threshold, 10);
    }

    #[test]
    fn test_business_settings_partial_json() {
        // The backend may omit optional fields entirely
        let settings: BusinessSettings =
            serde_json::from_str(r#"{"businessName":"Acme","taxRate":8.25}"#).unwrap();
        assert_eq!(settings.business_name, "Acme");
        assert_eq!(settings.tax_rate().bps(), 825);
        assert_eq!(settings.currency, "USD");
    }
}
