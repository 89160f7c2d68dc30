//! # Receipt Renderer
//!
//! Pure formatting: a completed transaction plus the cart snapshot it was
//! built from become a printable document. Actual printing belongs to the
//! embedding shell; a failed print never rolls back the committed sale.
//!
//! ## Layout
//! ```text
//! ┌──────────────────────────────────────────┐
//! │            Thank you for shopping!       │  receipt header (settings)
//! │  ----------------------------------------│
//! │               Downtown                   │  store block
//! │              1 Main St                   │
//! │        Springfield, IL 62701             │
//! │               555-0100                   │
//! │  Transaction: TXN-20260807-0001          │
//! │  2026-08-07 14:30                        │
//! │  ----------------------------------------│
//! │  Denim Jacket (M)      x2         $99.98 │  one line per cart item
//! │  ----------------------------------------│
//! │  Subtotal                         $99.98 │
//! │  Tax (10%)                        $10.00 │
//! │  TOTAL                           $109.98 │
//! │  CASH                            $120.00 │
//! │  Change                           $10.02 │  only CASH with change > 0
//! │  ----------------------------------------│
//! │          No refunds after 30 days        │  receipt footer (settings)
//! │        Thank you for your purchase!      │
//! │             Please come again            │
//! └──────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use meridian_core::cart::CartItem;
use meridian_core::money::{Currency, Money};
use meridian_core::types::{BusinessSettings, PaymentMethod, Store, Transaction};

/// Character width of the rendered receipt (thermal-paper friendly).
pub const DEFAULT_RECEIPT_WIDTH: usize = 42;

// =============================================================================
// Receipt Document
// =============================================================================

/// One printable line item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub subtotal_cents: i64,
}

/// A self-contained printable receipt document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_no: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub header: String,
    pub store_name: String,
    pub store_lines: Vec<String>,
    pub items: Vec<ReceiptLine>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub tax_rate_percent: f64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub amount_paid_cents: i64,
    pub change_cents: i64,
    pub footer: String,
    pub currency: Currency,
}

/// Builds a receipt from the persisted transaction and the cart snapshot it
/// was created from.
///
/// The backend's numbers are authoritative; the cart snapshot only supplies
/// display names and quantities for the line items.
pub fn build_receipt(
    transaction: &Transaction,
    items: &[CartItem],
    settings: &BusinessSettings,
    store: Option<&Store>,
) -> Receipt {
    let store_name = store
        .map(|s| s.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| {
            if settings.business_name.is_empty() {
                "Retail POS".to_string()
            } else {
                settings.business_name.clone()
            }
        });

    let store_lines = store
        .map(|s| {
            vec![
                s.address.clone(),
                format!("{}, {} {}", s.city, s.state, s.zip_code),
                s.phone.clone(),
            ]
        })
        .unwrap_or_default();

    Receipt {
        transaction_no: transaction.transaction_no.clone(),
        timestamp: transaction.created_at,
        header: settings.receipt_header.clone(),
        store_name,
        store_lines,
        items: items
            .iter()
            .map(|item| ReceiptLine {
                name: item.name.clone(),
                quantity: item.quantity,
                subtotal_cents: item.subtotal_cents(),
            })
            .collect(),
        subtotal_cents: transaction.subtotal_cents,
        tax_cents: transaction.tax_cents,
        tax_rate_percent: settings.tax_rate,
        total_cents: transaction.total_cents,
        payment_method: transaction.payment_method,
        amount_paid_cents: transaction.amount_paid_cents,
        change_cents: transaction.change_cents,
        footer: settings.receipt_footer.clone(),
        currency: settings.currency(),
    }
}

impl Receipt {
    /// Renders the document at the default thermal width.
    pub fn render_text(&self) -> String {
        self.render(DEFAULT_RECEIPT_WIDTH)
    }

    /// Renders the document as a fixed-width monospaced block.
    pub fn render(&self, width: usize) -> String {
        let mut out: Vec<String> = Vec::new();
        let divider = "-".repeat(width);

        if !self.header.is_empty() {
            out.push(center(&self.header, width));
            out.push(divider.clone());
        }

        out.push(center(&self.store_name, width));
        for line in &self.store_lines {
            if !line.is_empty() {
                out.push(center(line, width));
            }
        }
        out.push(format!("Transaction: {}", self.transaction_no));
        out.push(self.timestamp.format("%Y-%m-%d %H:%M").to_string());
        out.push(divider.clone());

        for item in &self.items {
            let amount = self.currency.format(Money::from_cents(item.subtotal_cents));
            let qty = format!("x{}", item.quantity);
            out.push(item_row(&item.name, &qty, &amount, width));
        }
        out.push(divider.clone());

        out.push(row(
            "Subtotal",
            &self.currency.format(Money::from_cents(self.subtotal_cents)),
            width,
        ));
        out.push(row(
            &format!("Tax ({}%)", format_percent(self.tax_rate_percent)),
            &self.currency.format(Money::from_cents(self.tax_cents)),
            width,
        ));
        out.push(row(
            "TOTAL",
            &self.currency.format(Money::from_cents(self.total_cents)),
            width,
        ));
        out.push(row(
            self.payment_method.label(),
            &self.currency.format(Money::from_cents(self.amount_paid_cents)),
            width,
        ));

        // Change only makes sense for cash, and only when there is some
        if self.payment_method == PaymentMethod::Cash && self.change_cents > 0 {
            out.push(row(
                "Change",
                &self.currency.format(Money::from_cents(self.change_cents)),
                width,
            ));
        }
        out.push(divider);

        if !self.footer.is_empty() {
            out.push(center(&self.footer, width));
        }
        out.push(center("Thank you for your purchase!", width));
        out.push(center("Please come again", width));

        out.join("\n")
    }
}

// =============================================================================
// Layout Helpers
// =============================================================================

/// Centers text within the width (left-biased on odd padding).
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = (width - len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// A label/value row with the value right-aligned.
fn row(label: &str, value: &str, width: usize) -> String {
    let label_len = label.chars().count();
    let value_len = value.chars().count();

    if label_len + value_len + 1 > width {
        return format!("{} {}", label, value);
    }

    let pad = width - label_len - value_len;
    format!("{}{}{}", label, " ".repeat(pad), value)
}

/// An item row: name left, quantity in a middle column, amount right.
/// Long names are truncated to keep the columns aligned.
fn item_row(name: &str, qty: &str, amount: &str, width: usize) -> String {
    let qty_col = 5;
    let amount_len = amount.chars().count();
    let name_width = width.saturating_sub(qty_col + amount_len + 2);

    let name: String = if name.chars().count() > name_width {
        name.chars().take(name_width).collect()
    } else {
        name.to_string()
    };

    let name_len = name.chars().count();
    format!(
        "{}{} {:>qty_col$} {}",
        name,
        " ".repeat(name_width - name_len),
        qty,
        amount,
        qty_col = qty_col
    )
}

/// Drops trailing zeros from a percentage: 10 → "10", 8.25 → "8.25".
fn format_percent(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{:.0}", rate)
    } else {
        format!("{}", rate)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use meridian_core::types::TransactionType;

    fn cart_item(name: &str, quantity: i64, unit_price_cents: i64) -> CartItem {
        CartItem {
            variant_id: "v1".to_string(),
            sku: "SKU-1".to_string(),
            name: name.to_string(),
            unit_price_cents,
            stock_quantity: 10,
            discount_cents: 0,
            quantity,
            added_at: Utc::now(),
        }
    }

    fn transaction(method: PaymentMethod, paid: i64, change: i64) -> Transaction {
        Transaction {
            id: "t1".to_string(),
            transaction_no: "TXN-0001".to_string(),
            transaction_type: TransactionType::Sale,
            store_id: "s1".to_string(),
            cashier_id: "u1".to_string(),
            subtotal_cents: 2000,
            tax_cents: 200,
            discount_cents: 0,
            total_cents: 2200,
            payment_method: method,
            amount_paid_cents: paid,
            change_cents: change,
            items: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 7, 14, 30, 0).unwrap(),
        }
    }

    fn settings() -> BusinessSettings {
        BusinessSettings {
            business_name: "Acme Retail".to_string(),
            tax_rate: 10.0,
            receipt_header: "Welcome!".to_string(),
            receipt_footer: "No refunds after 30 days".to_string(),
            ..BusinessSettings::default()
        }
    }

    fn store() -> Store {
        Store {
            id: "s1".to_string(),
            name: "Downtown".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            phone: "555-0100".to_string(),
            email: None,
            is_active: true,
        }
    }

    #[test]
    fn test_cash_receipt_shows_change() {
        let tx = transaction(PaymentMethod::Cash, 2500, 300);
        let items = vec![cart_item("Denim Jacket", 2, 1000)];
        let receipt = build_receipt(&tx, &items, &settings(), Some(&store()));
        let text = receipt.render_text();

        assert!(text.contains("Welcome!"));
        assert!(text.contains("Downtown"));
        assert!(text.contains("Transaction: TXN-0001"));
        assert!(text.contains("Denim Jacket"));
        assert!(text.contains("x2"));
        assert!(text.contains("$20.00")); // subtotal and line amount
        assert!(text.contains("Tax (10%)"));
        assert!(text.contains("$22.00")); // total
        assert!(text.contains("CASH"));
        assert!(text.contains("$25.00")); // tendered
        assert!(text.contains("Change"));
        assert!(text.contains("$3.00"));
        assert!(text.contains("No refunds after 30 days"));
    }

    #[test]
    fn test_exact_cash_omits_change_line() {
        let tx = transaction(PaymentMethod::Cash, 2200, 0);
        let receipt = build_receipt(&tx, &[cart_item("Widget", 1, 2000)], &settings(), None);
        assert!(!receipt.render_text().contains("Change"));
    }

    #[test]
    fn test_card_receipt_omits_change_line() {
        let tx = transaction(PaymentMethod::Card, 2200, 0);
        let receipt = build_receipt(&tx, &[cart_item("Widget", 1, 2000)], &settings(), None);
        let text = receipt.render_text();
        assert!(text.contains("CARD"));
        assert!(!text.contains("Change"));
    }

    #[test]
    fn test_missing_store_falls_back_to_business_name() {
        let tx = transaction(PaymentMethod::Cash, 2200, 0);
        let receipt = build_receipt(&tx, &[], &settings(), None);
        assert_eq!(receipt.store_name, "Acme Retail");
        assert!(receipt.store_lines.is_empty());
    }

    #[test]
    fn test_fractional_tax_rate_display() {
        let tx = transaction(PaymentMethod::Cash, 2200, 0);
        let mut s = settings();
        s.tax_rate = 8.25;
        let receipt = build_receipt(&tx, &[], &s, None);
        assert!(receipt.render_text().contains("Tax (8.25%)"));
    }

    #[test]
    fn test_long_item_names_truncate_to_width() {
        let tx = transaction(PaymentMethod::Cash, 2200, 0);
        let long = "An Extremely Long Product Name That Cannot Possibly Fit";
        let receipt = build_receipt(&tx, &[cart_item(long, 1, 2000)], &settings(), None);

        for line in receipt.render_text().lines() {
            assert!(line.chars().count() <= DEFAULT_RECEIPT_WIDTH);
        }
    }
}
