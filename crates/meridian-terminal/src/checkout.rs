//! # Checkout Flow
//!
//! Turns a finalized cart into a persisted sale.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Lifecycle                                 │
//! │                                                                         │
//! │  ┌──────────┐   initiate()   ┌──────────┐   submit()    ┌──────────┐   │
//! │  │   Idle   │───────────────►│ Payment  │──────────────►│Submitting│   │
//! │  │          │                │  Modal   │               │          │   │
//! │  └──────────┘                └──────────┘               └────┬─────┘   │
//! │       ▲                           ▲                          │         │
//! │       │     empty cart /          │        backend rejected  │         │
//! │       │     no store: refused     └──────────────────────────┤         │
//! │       │     (nothing changes)       (cart & modal intact,    │         │
//! │       │                              cashier retries)        │         │
//! │       │                                                      ▼         │
//! │       │                    success: receipt rendered,  ┌──────────┐    │
//! │       └────────────────────cart cleared, notification──│ Complete │    │
//! │                                                        └──────────┘    │
//! │                                                                         │
//! │  Local validation (cash sufficiency) blocks BEFORE any request.         │
//! │  One submission in flight at a time; duplicate submits are refused.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use meridian_client::{ApiClient, ClientResult, NewTransaction, NewTransactionItem};
use meridian_core::cart::CartTotals;
use meridian_core::money::Money;
use meridian_core::types::{PaymentMethod, Transaction, TransactionType};
use meridian_core::validation::validate_tendered_amount;

use crate::error::TerminalError;
use crate::events::{EventSink, Notification};
use crate::receipt::{build_receipt, Receipt};
use crate::state::{CartState, SessionContext, SettingsState};

// =============================================================================
// Transaction Gateway Seam
// =============================================================================

/// Sale submission, abstracted so the flow is testable without a backend.
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// Creates a sale and returns the persisted transaction.
    async fn create_sale(&self, request: &NewTransaction) -> ClientResult<Transaction>;
}

#[async_trait]
impl TransactionGateway for ApiClient {
    async fn create_sale(&self, request: &NewTransaction) -> ClientResult<Transaction> {
        self.transactions().create(request).await
    }
}

// =============================================================================
// Flow Outputs
// =============================================================================

/// What `initiate` hands the payment modal.
#[derive(Debug, Clone)]
pub struct CheckoutSummary {
    /// Store the sale will bill against.
    pub store_id: String,
    /// Priced cart summary at the current tax rate.
    pub totals: CartTotals,
}

/// A successfully persisted sale plus its printable receipt.
#[derive(Debug, Clone)]
pub struct CompletedSale {
    pub transaction: Transaction,
    pub receipt: Receipt,
}

// =============================================================================
// Checkout Flow
// =============================================================================

/// Drives checkout for one terminal session.
pub struct CheckoutFlow {
    gateway: Arc<dyn TransactionGateway>,
    cart: CartState,
    settings: Arc<SettingsState>,
    session: Arc<SessionContext>,
    events: Arc<dyn EventSink>,
    submitting: AtomicBool,
}

impl CheckoutFlow {
    /// Wires a checkout flow from its collaborators.
    pub fn new(
        gateway: Arc<dyn TransactionGateway>,
        cart: CartState,
        settings: Arc<SettingsState>,
        session: Arc<SessionContext>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        CheckoutFlow {
            gateway,
            cart,
            settings,
            session,
            events,
            submitting: AtomicBool::new(false),
        }
    }

    /// Whether a submission is currently in flight (the shell disables the
    /// submit control on this).
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Validates that checkout can begin and prices the cart for the
    /// payment modal.
    ///
    /// Refused (with a notification, no state change) when the cart is
    /// empty or no store is selected.
    pub fn initiate(&self) -> Result<CheckoutSummary, TerminalError> {
        if self.cart.with_cart(|c| c.is_empty()) {
            let err = TerminalError::empty_cart();
            self.events.notify(Notification::warning(&err.message));
            return Err(err);
        }

        let Some(store_id) = self.session.store_id() else {
            let err = TerminalError::no_store_selected();
            self.events.notify(Notification::warning(&err.message));
            return Err(err);
        };

        let rate = self.settings.tax_rate();
        let totals = self.cart.with_cart(|c| c.totals(rate));
        debug!(store_id = %store_id, total = totals.total_cents, "checkout initiated");

        Ok(CheckoutSummary { store_id, totals })
    }

    /// Submits the sale.
    ///
    /// For CASH the raw tendered string from the keypad is parsed and must
    /// cover the total; CARD and MOBILE_PAYMENT charge exactly the total.
    /// On success the cart is cleared and the receipt returned; on failure
    /// the cart and modal state stay intact so the cashier can retry.
    pub async fn submit(
        &self,
        method: PaymentMethod,
        tendered: Option<&str>,
    ) -> Result<CompletedSale, TerminalError> {
        let summary = self.initiate()?;
        let settings = self.settings.snapshot();
        let currency = settings.currency();
        let total = Money::from_cents(summary.totals.total_cents);

        let amount_paid = match method {
            PaymentMethod::Cash => {
                let raw = tendered.unwrap_or_default();
                let amount = currency.parse(raw).map_err(|e| {
                    let err = TerminalError::from(e);
                    self.events.notify(Notification::error(&err.message));
                    err
                })?;
                validate_tendered_amount(amount).map_err(|e| {
                    let err = TerminalError::from(e);
                    self.events.notify(Notification::error(&err.message));
                    err
                })?;
                if amount < total {
                    let err = TerminalError::insufficient_amount();
                    self.events.notify(Notification::error(&err.message));
                    return Err(err);
                }
                amount
            }
            // Card and mobile charge exactly the total
            PaymentMethod::Card | PaymentMethod::MobilePayment => total,
        };

        // Single in-flight submission per checkout; repeated clicks while
        // pending must not create duplicate sales
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(TerminalError::submission_in_flight());
        }
        let _guard = InFlightGuard(&self.submitting);

        let items_snapshot = self.cart.with_cart(|c| c.items.clone());
        let request = NewTransaction {
            store_id: summary.store_id.clone(),
            cashier_id: self.session.user().id.clone(),
            transaction_type: TransactionType::Sale,
            items: items_snapshot
                .iter()
                .map(|item| NewTransactionItem {
                    product_variant_id: item.variant_id.clone(),
                    quantity: item.quantity,
                    discount_cents: item.discount_cents,
                })
                .collect(),
            payment_method: method,
            amount_paid_cents: amount_paid.cents(),
            tax_cents: summary.totals.tax_cents,
            discount_cents: 0,
            // Fresh per attempt; the backend deduplicates on it, closing the
            // duplicate-sale window a transport retry would otherwise open
            idempotency_key: Uuid::new_v4(),
        };

        match self.gateway.create_sale(&request).await {
            Ok(transaction) => {
                let receipt = build_receipt(
                    &transaction,
                    &items_snapshot,
                    &settings,
                    self.session.selected_store().as_ref(),
                );

                self.cart.with_cart_mut(|c| c.clear());

                info!(
                    transaction_no = %transaction.transaction_no,
                    total = transaction.total_cents,
                    items = items_snapshot.len(),
                    "sale completed"
                );
                self.events.notify(Notification::success(format!(
                    "Sale {} completed",
                    transaction.transaction_no
                )));

                Ok(CompletedSale {
                    transaction,
                    receipt,
                })
            }
            Err(e) => {
                warn!(error = %e, "sale submission failed");
                let err = TerminalError::from(e);
                self.events.notify(Notification::error(&err.message));
                Err(err)
            }
        }
    }
}

/// Clears the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meridian_client::ClientError;
    use meridian_core::types::{BusinessSettings, ProductVariant, Store, User, UserRole};
    use std::sync::Mutex;

    fn variant(id: &str, price_cents: i64) -> ProductVariant {
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
            stock_quantity: 10,
            low_stock_threshold: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cashier() -> User {
        User {
            id: "u1".to_string(),
            email: "cashier@example.com".to_string(),
            first_name: "Alex".to_string(),
            last_name: "Kim".to_string(),
            role: UserRole::Cashier,
            store_id: Some("s1".to_string()),
            is_active: true,
        }
    }

    fn ten_percent_settings() -> Arc<SettingsState> {
        Arc::new(SettingsState::with_settings(BusinessSettings {
            tax_rate: 10.0,
            ..BusinessSettings::default()
        }))
    }

    /// Gateway fake that echoes the request into a persisted transaction.
    struct FakeGateway {
        requests: Mutex<Vec<NewTransaction>>,
        fail_with: Option<String>,
    }

    impl FakeGateway {
        fn ok() -> Arc<Self> {
            Arc::new(FakeGateway {
                requests: Mutex::new(Vec::new()),
                fail_with: None,
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(FakeGateway {
                requests: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            })
        }

        fn requests(&self) -> Vec<NewTransaction> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TransactionGateway for FakeGateway {
        async fn create_sale(&self, request: &NewTransaction) -> ClientResult<Transaction> {
            self.requests.lock().unwrap().push(request.clone());

            if let Some(message) = &self.fail_with {
                return Err(ClientError::Validation(message.clone()));
            }

            let subtotal: i64 = request
                .items
                .iter()
                .map(|i| i.quantity * 1000 - i.discount_cents)
                .sum();
            let total = subtotal + request.tax_cents;

            Ok(Transaction {
                id: "t1".to_string(),
                transaction_no: "TXN-0001".to_string(),
                transaction_type: TransactionType::Sale,
                store_id: request.store_id.clone(),
                cashier_id: request.cashier_id.clone(),
                subtotal_cents: subtotal,
                tax_cents: request.tax_cents,
                discount_cents: request.discount_cents,
                total_cents: total,
                payment_method: request.payment_method,
                amount_paid_cents: request.amount_paid_cents,
                change_cents: (request.amount_paid_cents - total).max(0),
                items: Vec::new(),
                created_at: Utc::now(),
            })
        }
    }

    fn flow(gateway: Arc<dyn TransactionGateway>) -> (CheckoutFlow, CartState) {
        let cart = CartState::new();
        let checkout = CheckoutFlow::new(
            gateway,
            cart.clone(),
            ten_percent_settings(),
            Arc::new(SessionContext::new(cashier())),
            Arc::new(crate::events::NoOpSink),
        );
        (checkout, cart)
    }

    #[test]
    fn test_initiate_refuses_empty_cart() {
        let (checkout, _cart) = flow(FakeGateway::ok());

        let err = checkout.initiate().unwrap_err();
        assert_eq!(err.message, "Cart is empty");
    }

    #[tokio::test]
    async fn test_initiate_refuses_missing_store() {
        let gateway = FakeGateway::ok();
        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_item(&variant("1", 1000))).unwrap();

        let mut user = cashier();
        user.store_id = None;

        let checkout = CheckoutFlow::new(
            gateway,
            cart,
            ten_percent_settings(),
            Arc::new(SessionContext::new(user)),
            Arc::new(crate::events::NoOpSink),
        );

        let err = checkout.initiate().unwrap_err();
        assert_eq!(err.message, "Select a store first");
    }

    #[tokio::test]
    async fn test_cash_sale_happy_path() {
        let gateway = FakeGateway::ok();
        let (checkout, cart) = flow(gateway.clone());

        // unitPrice $10.00 × 2 → subtotal $20.00, tax 10% → total $22.00
        let v = variant("1", 1000);
        cart.with_cart_mut(|c| {
            c.add_item(&v)?;
            c.add_item(&v)
        })
        .unwrap();

        let sale = checkout
            .submit(PaymentMethod::Cash, Some("25.00"))
            .await
            .unwrap();

        assert_eq!(sale.transaction.total_cents, 2200);
        assert_eq!(sale.transaction.amount_paid_cents, 2500);
        assert_eq!(sale.transaction.change_cents, 300);

        // Cart cleared, flag released
        assert!(cart.with_cart(|c| c.is_empty()));
        assert!(!checkout.is_submitting());

        // The request carried the right shape
        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].items.len(), 1);
        assert_eq!(requests[0].items[0].quantity, 2);
        assert_eq!(requests[0].tax_cents, 200);
        assert_eq!(requests[0].store_id, "s1");
        assert_eq!(requests[0].cashier_id, "u1");
    }

    #[tokio::test]
    async fn test_insufficient_cash_blocks_locally() {
        let gateway = FakeGateway::ok();
        let (checkout, cart) = flow(gateway.clone());

        let v = variant("1", 1000);
        cart.with_cart_mut(|c| {
            c.add_item(&v)?;
            c.add_item(&v)
        })
        .unwrap();

        // $15.00 against a $22.00 total
        let err = checkout
            .submit(PaymentMethod::Cash, Some("15.00"))
            .await
            .unwrap_err();

        assert_eq!(err.message, "Insufficient amount received");
        // No request went out, cart untouched
        assert!(gateway.requests().is_empty());
        assert_eq!(cart.with_cart(|c| c.item_count()), 1);
    }

    #[tokio::test]
    async fn test_card_charges_exactly_the_total() {
        let gateway = FakeGateway::ok();
        let (checkout, cart) = flow(gateway.clone());

        cart.with_cart_mut(|c| c.add_item(&variant("1", 1000))).unwrap();

        // Tendered input is ignored for card payments
        let sale = checkout
            .submit(PaymentMethod::Card, Some("999.99"))
            .await
            .unwrap();

        assert_eq!(sale.transaction.amount_paid_cents, 1100);
        assert_eq!(sale.transaction.change_cents, 0);
        assert!(!sale.receipt.render_text().contains("Change"));
    }

    #[tokio::test]
    async fn test_backend_rejection_keeps_cart_for_retry() {
        let gateway = FakeGateway::failing("Insufficient stock for SKU-1");
        let (checkout, cart) = flow(gateway.clone());

        cart.with_cart_mut(|c| c.add_item(&variant("1", 1000))).unwrap();

        let err = checkout
            .submit(PaymentMethod::Cash, Some("20.00"))
            .await
            .unwrap_err();

        // Backend text surfaces verbatim, cart stays for retry
        assert_eq!(err.message, "Insufficient stock for SKU-1");
        assert_eq!(cart.with_cart(|c| c.item_count()), 1);
        assert!(!checkout.is_submitting());
    }

    #[tokio::test]
    async fn test_each_attempt_mints_a_fresh_idempotency_key() {
        let gateway = FakeGateway::failing("conflict");
        let (checkout, cart) = flow(gateway.clone());

        cart.with_cart_mut(|c| c.add_item(&variant("1", 1000))).unwrap();

        let _ = checkout.submit(PaymentMethod::Cash, Some("20.00")).await;
        let _ = checkout.submit(PaymentMethod::Cash, Some("20.00")).await;

        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert_ne!(requests[0].idempotency_key, requests[1].idempotency_key);
    }

    #[tokio::test]
    async fn test_invalid_tendered_string_is_refused() {
        let gateway = FakeGateway::ok();
        let (checkout, cart) = flow(gateway.clone());

        cart.with_cart_mut(|c| c.add_item(&variant("1", 1000))).unwrap();

        assert!(checkout.submit(PaymentMethod::Cash, Some("abc")).await.is_err());
        assert!(checkout.submit(PaymentMethod::Cash, None).await.is_err());
        assert!(gateway.requests().is_empty());
    }
}
