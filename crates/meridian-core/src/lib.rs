//! # meridian-core: Pure Business Logic for Meridian POS
//!
//! This crate is the **heart** of Meridian POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Meridian POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Web UI Shell                               │   │
//! │  │    Search box ──► Cart panel ──► Payment modal ──► Receipt      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  meridian-terminal                              │   │
//! │  │    session state, variant cache, debounced search, checkout     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meridian-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  search   │  │   │
//! │  │   │  Variant  │  │   Money   │  │   Cart    │  │  scoring  │  │   │
//! │  │   │  Store    │  │  TaxRate  │  │ CartItem  │  │  ranking  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  meridian-client (REST backend)                 │   │
//! │  │       products, variants, transactions, stores, settings        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductVariant, Transaction, Store, etc.)
//! - [`money`] - Money/TaxRate/Currency with integer arithmetic (no floats!)
//! - [`cart`] - The cart engine for the active sale
//! - [`search`] - Fuzzy scoring and ranking for client-side lookup
//! - [`capability`] - Role capabilities as a pure function
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, and clock-driven behavior are FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::money::{Money, TaxRate};
//!
//! // Create money from cents (never from floats!)
//! let subtotal = Money::from_cents(2000); // $20.00
//!
//! // Tax comes from business settings as a percentage
//! let rate = TaxRate::from_percentage(10.0);
//! let tax = subtotal.calculate_tax(rate);
//!
//! assert_eq!(tax.cents(), 200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod capability;
pub mod cart;
pub mod error;
pub mod money;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use meridian_core::Money` instead of
// `use meridian_core::money::Money`

pub use capability::{allowed_capabilities, is_allowed, Capability};
pub use cart::{Cart, CartItem, CartTotals, StockPolicy};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Currency, Money, TaxRate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
/// Can be made configurable per-business in future versions.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
/// Configurable per-business in future versions.
pub const MAX_ITEM_QUANTITY: i64 = 999;
