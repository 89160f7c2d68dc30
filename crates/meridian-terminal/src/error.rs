//! # Terminal Error Type
//!
//! Unified user-facing error for terminal operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Meridian POS                           │
//! │                                                                         │
//! │  UI Shell                      Terminal Core                            │
//! │  ────────                      ─────────────                            │
//! │                                                                         │
//! │  checkout.submit(...)                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Flow Method                                                     │  │
//! │  │  Result<T, TerminalError>                                        │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Client error? ── ClientError::Validation("...") ──┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Cart error? ──── CoreError::InsufficientStock ── TerminalError ►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The shell matches on `code` and shows `message` to the cashier.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use meridian_client::ClientError;
use meridian_core::{CoreError, ValidationError};

/// User-facing error returned from terminal operations.
///
/// ## Serialization
/// What the UI shell receives when an operation fails:
/// ```json
/// { "code": "PAYMENT_ERROR", "message": "Insufficient amount received" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for terminal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Transport failure talking to the backend
    NetworkError,

    /// Session token missing or expired
    Unauthorized,

    /// Authenticated but not allowed
    Forbidden,

    /// Cart operation failed
    CartError,

    /// Insufficient stock
    InsufficientStock,

    /// Payment processing error
    PaymentError,

    /// Backend rejected the operation
    BusinessLogic,

    /// Everything else
    Internal,
}

impl TerminalError {
    /// Creates a new terminal error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        TerminalError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        TerminalError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        TerminalError::new(ErrorCode::CartError, message)
    }

    /// Checkout attempted with nothing in the cart.
    pub fn empty_cart() -> Self {
        TerminalError::new(ErrorCode::CartError, "Cart is empty")
    }

    /// Checkout attempted without a store selection.
    pub fn no_store_selected() -> Self {
        TerminalError::new(ErrorCode::ValidationError, "Select a store first")
    }

    /// Cash tendered below the total.
    pub fn insufficient_amount() -> Self {
        TerminalError::new(ErrorCode::PaymentError, "Insufficient amount received")
    }

    /// A submission is already in flight for this checkout.
    pub fn submission_in_flight() -> Self {
        TerminalError::new(ErrorCode::PaymentError, "A sale is already being processed")
    }
}

/// Converts client errors to terminal errors.
impl From<ClientError> for TerminalError {
    fn from(err: ClientError) -> Self {
        let message = err.user_message();
        match err {
            ClientError::Unauthorized => TerminalError::new(ErrorCode::Unauthorized, message),
            ClientError::Forbidden(_) => TerminalError::new(ErrorCode::Forbidden, message),
            ClientError::NotFound(_) => TerminalError::new(ErrorCode::NotFound, message),
            ClientError::Validation(_) => TerminalError::new(ErrorCode::ValidationError, message),
            ClientError::Server(_) => TerminalError::new(ErrorCode::BusinessLogic, message),
            ClientError::Http(e) => {
                // Log the transport detail but keep the message generic
                tracing::error!(error = %e, "backend request failed");
                TerminalError::new(ErrorCode::NetworkError, message)
            }
            ClientError::InvalidResponse(e) => {
                tracing::error!(error = %e, "malformed backend response");
                TerminalError::new(ErrorCode::Internal, message)
            }
            ClientError::Serialization(e) => {
                tracing::error!(error = %e, "payload serialization failed");
                TerminalError::new(ErrorCode::Internal, message)
            }
        }
    }
}

/// Converts core errors to terminal errors.
impl From<CoreError> for TerminalError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::VariantNotInCart(_) => TerminalError::cart(err.to_string()),
            CoreError::InsufficientStock { .. } => {
                TerminalError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::CartTooLarge { .. } => TerminalError::cart(err.to_string()),
            CoreError::QuantityTooLarge { .. } => TerminalError::validation(err.to_string()),
            CoreError::Validation(_) => TerminalError::validation(err.to_string()),
        }
    }
}

/// Converts bare validation errors to terminal errors.
impl From<ValidationError> for TerminalError {
    fn from(err: ValidationError) -> Self {
        TerminalError::validation(err.to_string())
    }
}

impl std::fmt::Display for TerminalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for TerminalError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_mapping() {
        let err = TerminalError::from(ClientError::Unauthorized);
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let err = TerminalError::from(ClientError::Validation("Insufficient stock".to_string()));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Insufficient stock");
    }

    #[test]
    fn test_core_error_mapping() {
        let err = TerminalError::from(CoreError::InsufficientStock {
            sku: "DJ-001".to_string(),
            available: 1,
            requested: 2,
        });
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(TerminalError::insufficient_amount()).unwrap();
        assert_eq!(json["code"], "PAYMENT_ERROR");
    }
}
