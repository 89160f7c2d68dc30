//! # Cart Engine
//!
//! The in-memory cart for the active sale.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action            Operation              Cart Change           │
//! │  ──────────────            ─────────              ───────────           │
//! │                                                                         │
//! │  Pick search result ─────► add_item() ──────────► +1 or new line        │
//! │                                                                         │
//! │  Tap +/- on a line ──────► update_quantity() ───► qty ± delta           │
//! │                            (qty ≤ 0 removes the line)                   │
//! │                                                                         │
//! │  Tap trash icon ─────────► remove_item() ───────► line dropped          │
//! │                                                                         │
//! │  Cancel sale / paid ─────► clear() ─────────────► empty cart            │
//! │                                                                         │
//! │  Totals panel ───────────► totals(rate) ────────► derived, never cached │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by variant id (adding an existing variant increments)
//! - A line's subtotal is always `quantity × unit_price - discount`,
//!   recomputed on read, never stored
//! - Quantity reaching zero removes the line
//! - Unit price is frozen at add time; later price changes don't touch the
//!   open cart

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TaxRate};
use crate::types::ProductVariant;
use crate::validation::validate_discount;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Stock Policy
// =============================================================================

/// Whether the cart enforces stock limits at add time.
///
/// The terminal stays responsive offline-first by default: overselling is
/// reconciled by the backend when the transaction is submitted. Businesses
/// that prefer a hard stop flip to `EnforceAtAdd` at cart construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum StockPolicy {
    /// Never block on stock locally; the transaction endpoint has the final
    /// word. Matches the historical terminal behavior.
    #[default]
    DeferToBackend,

    /// Reject adds and increments that exceed the cached stock quantity.
    EnforceAtAdd,
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the active sale.
///
/// ## Snapshot Pattern
/// Display fields and the unit price are frozen from the variant at add
/// time, so an inventory edit mid-sale never changes an open cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Variant this line sells.
    pub variant_id: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Display label at time of adding (frozen).
    pub name: String,

    /// Unit price in minor units at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Stock on hand at time of adding, kept for display and for the
    /// `EnforceAtAdd` policy.
    pub stock_quantity: i64,

    /// Line discount in minor units (defaults to 0).
    pub discount_cents: i64,

    /// Quantity in cart, always ≥ 1.
    pub quantity: i64,

    /// When this line was added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new line from a variant with quantity 1.
    pub fn from_variant(variant: &ProductVariant) -> Self {
        CartItem {
            variant_id: variant.id.clone(),
            sku: variant.sku.clone(),
            name: variant.label(),
            unit_price_cents: variant.selling_price_cents,
            stock_quantity: variant.stock_quantity,
            discount_cents: 0,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// The line subtotal: `quantity × unit_price - discount`.
    ///
    /// Derived on every read so the invariant can never go stale.
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.quantity * self.unit_price_cents - self.discount_cents
    }

    /// The line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents())
    }

    /// The unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The active sale: an ordered collection of [`CartItem`], at most one per
/// variant.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in insertion order.
    pub items: Vec<CartItem>,

    /// Stock enforcement behavior for this cart.
    pub policy: StockPolicy,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart with the default stock policy.
    pub fn new() -> Self {
        Cart::with_policy(StockPolicy::default())
    }

    /// Creates a new empty cart with an explicit stock policy.
    pub fn with_policy(policy: StockPolicy) -> Self {
        Cart {
            items: Vec::new(),
            policy,
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a variant to the cart.
    ///
    /// ## Behavior
    /// - Variant already in cart: quantity goes up by one
    /// - Otherwise: a new line is appended with the variant's current
    ///   selling price frozen in
    pub fn add_item(&mut self, variant: &ProductVariant) -> CoreResult<()> {
        if let Some(item) = self.items.iter_mut().find(|i| i.variant_id == variant.id) {
            let new_qty = item.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            if self.policy == StockPolicy::EnforceAtAdd && new_qty > item.stock_quantity {
                return Err(CoreError::InsufficientStock {
                    sku: item.sku.clone(),
                    available: item.stock_quantity,
                    requested: new_qty,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        if self.policy == StockPolicy::EnforceAtAdd && variant.stock_quantity < 1 {
            return Err(CoreError::InsufficientStock {
                sku: variant.sku.clone(),
                available: variant.stock_quantity,
                requested: 1,
            });
        }

        self.items.push(CartItem::from_variant(variant));
        Ok(())
    }

    /// Adjusts a line's quantity by a signed delta.
    ///
    /// ## Behavior
    /// - Resulting quantity ≤ 0: the line is removed entirely
    /// - Unknown variant id: error (a delta against nothing is a caller bug)
    pub fn update_quantity(&mut self, variant_id: &str, delta: i64) -> CoreResult<()> {
        let position = self
            .items
            .iter()
            .position(|i| i.variant_id == variant_id)
            .ok_or_else(|| CoreError::VariantNotInCart(variant_id.to_string()))?;

        let new_qty = self.items[position].quantity + delta;

        if new_qty <= 0 {
            self.items.remove(position);
            return Ok(());
        }

        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let item = &mut self.items[position];
        if delta > 0 && self.policy == StockPolicy::EnforceAtAdd && new_qty > item.stock_quantity {
            return Err(CoreError::InsufficientStock {
                sku: item.sku.clone(),
                available: item.stock_quantity,
                requested: new_qty,
            });
        }

        item.quantity = new_qty;
        Ok(())
    }

    /// Drops the matching line unconditionally. No-op when absent.
    pub fn remove_item(&mut self, variant_id: &str) {
        self.items.retain(|i| i.variant_id != variant_id);
    }

    /// Sets a line discount in minor units.
    ///
    /// The discount must be non-negative and cannot exceed the line gross
    /// (`quantity × unit_price`), so a subtotal can never go negative.
    pub fn set_discount(&mut self, variant_id: &str, discount_cents: i64) -> CoreResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.variant_id == variant_id)
            .ok_or_else(|| CoreError::VariantNotInCart(variant_id.to_string()))?;

        let gross = item.quantity * item.unit_price_cents;
        validate_discount(discount_cents, gross)?;

        item.discount_cents = discount_cents;
        Ok(())
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Returns the number of unique lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Calculates the subtotal (before tax).
    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(|i| i.subtotal_cents()).sum()
    }

    /// Calculates tax on the cart subtotal at the given rate.
    pub fn tax_cents(&self, rate: TaxRate) -> i64 {
        Money::from_cents(self.subtotal_cents())
            .calculate_tax(rate)
            .cents()
    }

    /// Calculates the grand total (subtotal + tax).
    pub fn total_cents(&self, rate: TaxRate) -> i64 {
        self.subtotal_cents() + self.tax_cents(rate)
    }

    /// Produces a priced summary for display and the payment modal.
    pub fn totals(&self, rate: TaxRate) -> CartTotals {
        CartTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            subtotal_cents: self.subtotal_cents(),
            tax_cents: self.tax_cents(rate),
            total_cents: self.total_cents(rate),
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Priced cart summary. Derived from the cart plus a tax rate, never stored
/// independently of its inputs.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_variant(id: &str, price_cents: i64, stock: i64) -> ProductVariant {
        ProductVariant {
            id: id.to_string(),
            product_id: format!("p-{}", id),
            product_name: format!("Product {}", id),
            sku: format!("SKU-{}", id),
            barcode: None,
            size: None,
            color: None,
            cost_price_cents: price_cents / 2,
            selling_price_cents: price_cents,
            stock_quantity: stock,
            low_stock_threshold: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let v = test_variant("1", 999, 10);

        cart.add_item(&v).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 1);
        assert_eq!(cart.subtotal_cents(), 999);
    }

    #[test]
    fn test_add_same_variant_twice_merges_lines() {
        let mut cart = Cart::new();
        let v = test_variant("1", 999, 10);

        cart.add_item(&v).unwrap();
        cart.add_item(&v).unwrap();

        assert_eq!(cart.item_count(), 1); // one line, not two
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.subtotal_cents(), 1998);
    }

    #[test]
    fn test_add_then_decrement_twice_restores_pre_add_state() {
        let mut cart = Cart::new();
        let v = test_variant("1", 999, 10);

        cart.add_item(&v).unwrap();
        cart.add_item(&v).unwrap();
        cart.update_quantity("1", -1).unwrap();
        cart.update_quantity("1", -1).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_large_negative_delta_removes_line() {
        let mut cart = Cart::new();
        let v = test_variant("1", 999, 10);

        cart.add_item(&v).unwrap();
        cart.add_item(&v).unwrap();
        // Delta bigger than the current quantity still just removes the line
        cart.update_quantity("1", -5).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_variant_errors() {
        let mut cart = Cart::new();
        let err = cart.update_quantity("ghost", 1).unwrap_err();
        assert!(matches!(err, CoreError::VariantNotInCart(_)));
    }

    #[test]
    fn test_remove_item_is_unconditional() {
        let mut cart = Cart::new();
        let v = test_variant("1", 999, 10);

        cart.add_item(&v).unwrap();
        cart.remove_item("1");
        assert!(cart.is_empty());

        // Removing a missing line is a silent no-op
        cart.remove_item("1");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_invariant_with_discount() {
        let mut cart = Cart::new();
        let v = test_variant("1", 1000, 10);

        cart.add_item(&v).unwrap();
        cart.add_item(&v).unwrap();
        cart.set_discount("1", 300).unwrap();

        // subtotal == quantity × unit_price - discount, at every read
        assert_eq!(cart.items[0].subtotal_cents(), 2 * 1000 - 300);
        assert_eq!(cart.subtotal_cents(), 1700);

        cart.update_quantity("1", 1).unwrap();
        assert_eq!(cart.items[0].subtotal_cents(), 3 * 1000 - 300);
    }

    #[test]
    fn test_discount_cannot_exceed_line_gross() {
        let mut cart = Cart::new();
        let v = test_variant("1", 1000, 10);

        cart.add_item(&v).unwrap();
        assert!(cart.set_discount("1", 1001).is_err());
        assert!(cart.set_discount("1", -1).is_err());
        assert!(cart.set_discount("1", 1000).is_ok());
    }

    #[test]
    fn test_totals_recomputed_never_cached() {
        let mut cart = Cart::new();
        let v = test_variant("1", 1000, 10);
        let rate = TaxRate::from_percentage(10.0);

        cart.add_item(&v).unwrap();
        cart.add_item(&v).unwrap();

        // $20.00 subtotal, 10% tax
        let totals = cart.totals(rate);
        assert_eq!(totals.subtotal_cents, 2000);
        assert_eq!(totals.tax_cents, 200);
        assert_eq!(totals.total_cents, 2200);

        // Mutate and re-derive: no stale numbers
        cart.update_quantity("1", -1).unwrap();
        let totals = cart.totals(rate);
        assert_eq!(totals.subtotal_cents, 1000);
        assert_eq!(totals.tax_cents, 100);
        assert_eq!(totals.total_cents, 1100);
    }

    #[test]
    fn test_frozen_price_survives_variant_change() {
        let mut cart = Cart::new();
        let mut v = test_variant("1", 1000, 10);

        cart.add_item(&v).unwrap();
        v.selling_price_cents = 9999; // price change after adding
        cart.add_item(&v).unwrap();

        // The line keeps the price captured at first add
        assert_eq!(cart.items[0].unit_price_cents, 1000);
        assert_eq!(cart.subtotal_cents(), 2000);
    }

    #[test]
    fn test_stock_policy_enforce_at_add() {
        let mut cart = Cart::with_policy(StockPolicy::EnforceAtAdd);
        let v = test_variant("1", 1000, 2);

        cart.add_item(&v).unwrap();
        cart.add_item(&v).unwrap();
        let err = cart.add_item(&v).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));

        // Increment path is guarded the same way
        let err = cart.update_quantity("1", 1).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));

        // Out of stock entirely: first add is refused
        let empty = test_variant("2", 500, 0);
        assert!(cart.add_item(&empty).is_err());
    }

    #[test]
    fn test_stock_policy_defer_allows_overselling() {
        let mut cart = Cart::new(); // DeferToBackend
        let v = test_variant("1", 1000, 1);

        cart.add_item(&v).unwrap();
        cart.add_item(&v).unwrap();
        cart.add_item(&v).unwrap();

        assert_eq!(cart.items[0].quantity, 3);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        let v = test_variant("1", 999, 10);

        cart.add_item(&v).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal_cents(), 0);
    }
}
