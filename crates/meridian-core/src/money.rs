//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, plus the
//! `TaxRate` and `Currency` companions used everywhere an amount is computed
//! or shown.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    $10.00 / 3 = $3.33 (×3 = $9.99)  → Lost $0.01!                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    1000 cents / 3 = 333 cents (×3 = 999 cents)                          │
//! │    We KNOW we lost 1 cent, and handle it explicitly                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meridian_core::money::{Currency, Money, TaxRate};
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // $21.98
//! let total = price + Money::from_cents(500);   // $15.99
//!
//! // Tendered cash comes in as a decimal string from the keypad
//! let usd = Currency::from_code("USD");
//! let tendered = usd.parse("25.00").unwrap();
//! assert_eq!(tendered.cents(), 2500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds, discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Variant.selling_price ──► CartItem.unit_price ──► CartItem.subtotal   │
/// │                                                                         │
/// │  Cart.subtotal ──► Tax Calculation ──► Cart.total ──► amount_paid      │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Why Cents?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The backend wire format, calculations, and cart all use cents.
    /// Only display formatting converts to major units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax for this amount at the given rate.
    ///
    /// ## Implementation
    /// Integer math with round-half-up: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::{Money, TaxRate};
    ///
    /// let subtotal = Money::from_cents(2000); // $20.00
    /// let rate = TaxRate::from_percentage(10.0);
    ///
    /// // $20.00 × 10% = $2.00
    /// assert_eq!(subtotal.calculate_tax(rate).cents(), 200);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // Use i128 to prevent overflow on large amounts
        // rate.bps() is basis points: 825 = 8.25%
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Variant: Cola 330ml $2.99
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Gross: $8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Money Trait Implementations
// =============================================================================

/// Display implementation shows money in a debug-friendly format.
///
/// ## Note
/// This is for logs and debugging. Use [`Currency::format`] for actual
/// display to honor the configured currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25% (e.g., Texas sales tax)
///
/// Business settings carry the rate as a percentage; conversion happens once
/// at the edge so all arithmetic stays integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (the settings representation).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Currency
// =============================================================================

/// Describes how amounts are rendered and parsed for one currency.
///
/// ## Built-in Table
/// | Code | Symbol | Decimals | Placement |
/// |------|--------|----------|-----------|
/// | USD  | $      | 2        | before    |
/// | EUR  | €      | 2        | before    |
/// | RUB  | ₽      | 2        | before    |
/// | UZS  | soʻm   | 0        | after     |
///
/// Unknown codes fall back to the code itself as the symbol with 2 decimals,
/// so an unconfigured backend never breaks display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// ISO 4217 currency code.
    pub code: String,

    /// Display symbol.
    pub symbol: String,

    /// Number of decimal places in the minor unit.
    pub decimals: u8,

    /// Whether the symbol trails the amount ("15000 soʻm" vs "$12.34").
    pub symbol_after: bool,
}

impl Currency {
    /// Looks up a currency by ISO code.
    pub fn from_code(code: &str) -> Self {
        let (symbol, decimals, symbol_after) = match code {
            "USD" => ("$", 2, false),
            "EUR" => ("€", 2, false),
            "RUB" => ("₽", 2, false),
            // Uzbek som typically doesn't use decimals, symbol goes after
            "UZS" => ("soʻm", 0, true),
            other => (other, 2, false),
        };

        Currency {
            code: code.to_string(),
            symbol: symbol.to_string(),
            decimals,
            symbol_after,
        }
    }

    /// Formats an amount with symbol and the proper number of decimals.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::{Currency, Money};
    ///
    /// let usd = Currency::from_code("USD");
    /// assert_eq!(usd.format(Money::from_cents(1234)), "$12.34");
    ///
    /// let uzs = Currency::from_code("UZS");
    /// assert_eq!(uzs.format(Money::from_cents(15000)), "15000 soʻm");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        let divisor = 10_i64.pow(self.decimals as u32);
        let sign = if amount.cents() < 0 { "-" } else { "" };
        let whole = (amount.cents() / divisor).abs();
        let frac = (amount.cents() % divisor).abs();

        let number = if self.decimals > 0 {
            format!("{}.{:0width$}", whole, frac, width = self.decimals as usize)
        } else {
            whole.to_string()
        };

        if self.symbol_after {
            format!("{}{} {}", sign, number, self.symbol)
        } else {
            format!("{}{}{}", sign, self.symbol, number)
        }
    }

    /// Parses a user-entered amount string into Money.
    ///
    /// Strips everything except digits, the decimal point, and a leading
    /// minus, then scales to this currency's minor unit. Extra fraction
    /// digits beyond `decimals` are truncated.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Currency;
    ///
    /// let usd = Currency::from_code("USD");
    /// assert_eq!(usd.parse("25.00").unwrap().cents(), 2500);
    /// assert_eq!(usd.parse("$12.34").unwrap().cents(), 1234);
    /// assert_eq!(usd.parse("25").unwrap().cents(), 2500);
    /// assert!(usd.parse("abc").is_err());
    /// ```
    pub fn parse(&self, input: &str) -> Result<Money, ValidationError> {
        let cleaned: String = input
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();

        if cleaned.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let negative = cleaned.starts_with('-');
        let unsigned = cleaned.trim_start_matches('-');
        if unsigned.contains('-') {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "misplaced minus sign".to_string(),
            });
        }

        let (whole_str, frac_str) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };

        if frac_str.contains('.') {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "multiple decimal points".to_string(),
            });
        }

        let whole: i64 = if whole_str.is_empty() {
            0
        } else {
            whole_str
                .parse()
                .map_err(|_| ValidationError::InvalidFormat {
                    field: "amount".to_string(),
                    reason: "not a number".to_string(),
                })?
        };

        // Scale the fraction to exactly `decimals` digits, padding or
        // truncating as needed
        let mut minor: i64 = 0;
        let frac_bytes = frac_str.as_bytes();
        for i in 0..self.decimals as usize {
            minor *= 10;
            if let Some(&b) = frac_bytes.get(i) {
                minor += (b - b'0') as i64;
            }
        }

        let cents = whole * 10_i64.pow(self.decimals as u32) + minor;
        Ok(Money::from_cents(if negative { -cents } else { cents }))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::from_code("USD")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
