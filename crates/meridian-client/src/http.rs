//! # HTTP Layer
//!
//! Thin reqwest wrapper every endpoint group goes through.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Request Pipeline                                   │
//! │                                                                         │
//! │  get("variants/sku/DJ-001")                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  attach bearer token ──► send ──► transport error?                      │
//! │                                        │                                │
//! │                          yes (connect/timeout): retry ONCE              │
//! │                                        │                                │
//! │                                        ▼                                │
//! │  status mapping: 401 → Unauthorized, 404 → NotFound,                    │
//! │                  400/422 → Validation, 5xx → Server                     │
//! │                                        │                                │
//! │                                        ▼                                │
//! │  decode ApiEnvelope<T> ──► data, or InvalidResponse when absent         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::types::ApiEnvelope;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

// =============================================================================
// Client Configuration
// =============================================================================

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://api.example.com/api`.
    pub base_url: String,

    /// Bearer token from the authenticated session, if any.
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Creates a config with the default timeout and no token.
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

// =============================================================================
// HTTP Client
// =============================================================================

/// HTTP client for making network requests to the backend.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Creates a new HTTP client from configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(HttpClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Returns the current token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Builds the authorization header value.
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Makes a GET request, retrying once on transient transport errors.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        match self.get_once(path).await {
            Err(ClientError::Http(e)) if is_transient(&e) => {
                debug!(path = %path, error = %e, "transient GET failure, retrying once");
                self.get_once(path).await
            }
            other => other,
        }
    }

    /// Makes a POST request with a JSON body, retrying once on transient
    /// transport errors. Safe for sale creation because every request body
    /// carries an idempotency key.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        match self.post_once(path, body).await {
            Err(ClientError::Http(e)) if is_transient(&e) => {
                debug!(path = %path, error = %e, "transient POST failure, retrying once");
                self.post_once(path, body).await
            }
            other => other,
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn post_once<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Maps status codes to typed errors and unwraps the envelope.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&text);

            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(message)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::Validation(message))
                }
                _ => Err(ClientError::Server(message)),
            };
        }

        let envelope: ApiEnvelope<T> = response.json().await?;

        if !envelope.success {
            let message = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "Request failed".to_string());
            return Err(ClientError::Server(message));
        }

        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("missing data field".to_string()))
    }
}

/// True for errors worth a single immediate retry.
fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Pulls the backend's error text out of an error-status body.
///
/// Error bodies are usually the same envelope with `error`/`message` set,
/// but a proxy can hand back anything, so fall back to the raw text.
fn extract_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) {
        if let Some(error) = envelope.error {
            return error;
        }
        if let Some(message) = envelope.message {
            return message;
        }
    }

    body.trim().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
