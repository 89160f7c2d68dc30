//! # meridian-client: Backend REST Client for Meridian POS
//!
//! This crate owns every byte that travels between the terminal and the
//! backend REST API.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Meridian POS Data Flow                             │
//! │                                                                         │
//! │  Terminal operation (search, checkout, cache refresh)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  meridian-client (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │  HttpClient   │    │  ApiClient    │    │  Wire DTOs   │   │   │
//! │  │   │  (http.rs)    │    │  (api.rs)     │    │  (types.rs)  │   │   │
//! │  │   │               │    │               │    │              │   │   │
//! │  │   │ bearer auth   │◄───│ products()    │    │ ApiEnvelope  │   │   │
//! │  │   │ retry-once    │    │ variants()    │    │ flattening   │   │   │
//! │  │   │ status→error  │    │ transactions()│    │ NewTransact. │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                External backend REST API                        │   │
//! │  │  GET /products · GET /variants/sku/{sku} · POST /transactions   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`http`] - reqwest wrapper: auth header, retry-once, status mapping
//! - [`api`] - endpoint accessor groups
//! - [`types`] - wire DTOs and variant flattening
//! - [`error`] - client error taxonomy

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod error;
pub mod http;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use api::ApiClient;
pub use error::{ClientError, ClientResult};
pub use http::ClientConfig;
pub use types::{NewTransaction, NewTransactionItem};
