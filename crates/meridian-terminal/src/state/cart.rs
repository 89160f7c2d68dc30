//! # Cart State
//!
//! Shared ownership wrapper around the active [`Cart`].
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Both the POS screen and the checkout flow touch the same cart
//! 2. Only one caller should modify the cart at a time
//! 3. Access is closure-scoped, so the lock can never be held across an await

use std::sync::{Arc, Mutex};

use meridian_core::cart::{Cart, StockPolicy};

/// Session-owned cart state.
///
/// ## Why Not RwLock?
/// Cart operations are quick and most of them mutate. A RwLock would add
/// complexity with minimal benefit.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state with the default stock policy.
    pub fn new() -> Self {
        CartState::with_policy(StockPolicy::default())
    }

    /// Creates a new empty cart state with an explicit stock policy.
    pub fn with_policy(policy: StockPolicy) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::with_policy(policy))),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals(rate));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&variant))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meridian_core::types::ProductVariant;

    fn variant() -> ProductVariant {
        ProductVariant {
            id: "v1".to_string(),
            product_id: "p1".to_string(),
            product_name: "Widget".to_string(),
            sku: "W-001".to_string(),
            barcode: None,
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

    #[test]
    fn test_clones_share_the_same_cart() {
        let state = CartState::new();
        let other = state.clone();

        state.with_cart_mut(|c| c.add_item(&variant())).unwrap();

        assert_eq!(other.with_cart(|c| c.item_count()), 1);
    }
}
