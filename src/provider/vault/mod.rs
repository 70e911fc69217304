//! Vault HTTP Client
//!
//! Native REST implementation for the Vault `sys/` control endpoints used to
//! initialize and unseal a server.
//! Uses reqwest with rustls (no OpenSSL dependencies) and works directly with
//! Pact HTTP mock servers.
//!
//! References:
//! - [Vault /sys/seal-status](https://developer.hashicorp.com/vault/api-docs/system/seal-status)
//! - [Vault /sys/init](https://developer.hashicorp.com/vault/api-docs/system/init)
//! - [Vault /sys/unseal](https://developer.hashicorp.com/vault/api-docs/system/unseal)

mod operations;
mod requests;
mod responses;

pub use requests::*;
pub use responses::*;

use crate::provider::VaultError;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::info;

/// Vault HTTP client
pub struct VaultHttpClient {
    http_client: Client,
    base_url: String,
}

impl std::fmt::Debug for VaultHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultHttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl VaultHttpClient {
    /// Create a new Vault client for `base_url` (e.g. `http://localhost:8200`)
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        info!(vault.addr = %base_url, "Initializing Vault HTTP client");

        let http_client = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map a transport failure to the gateway taxonomy
fn transport_error(operation: &str, err: &reqwest::Error) -> VaultError {
    if err.is_timeout() {
        VaultError::Connection(format!("{operation} timed out: {err}"))
    } else {
        VaultError::Connection(format!("{operation} failed: {err}"))
    }
}

/// Classify a non-success response to `PUT /v1/sys/init`
fn classify_init_error(status: StatusCode, error: &ErrorResponse) -> VaultError {
    let message = error.message();
    if status == StatusCode::BAD_REQUEST && message.to_lowercase().contains("already initialized")
    {
        return VaultError::AlreadyInitialized;
    }
    VaultError::UnexpectedStatus {
        status: status.as_u16(),
        message,
    }
}

/// Classify a non-success response to `PUT /v1/sys/unseal`
fn classify_unseal_error(status: StatusCode, error: &ErrorResponse) -> VaultError {
    if status == StatusCode::BAD_REQUEST {
        return VaultError::InvalidShare(error.message());
    }
    VaultError::UnexpectedStatus {
        status: status.as_u16(),
        message: error.message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_initialized_is_recognised() {
        let body = ErrorResponse::parse(r#"{"errors":["Vault is already initialized"]}"#);
        assert!(matches!(
            classify_init_error(StatusCode::BAD_REQUEST, &body),
            VaultError::AlreadyInitialized
        ));
    }

    #[test]
    fn test_other_init_failures_are_unexpected() {
        let body = ErrorResponse::parse(r#"{"errors":["secret threshold must be > 0"]}"#);
        match classify_init_error(StatusCode::BAD_REQUEST, &body) {
            VaultError::UnexpectedStatus { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "secret threshold must be > 0");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
        let unavailable = classify_init_error(StatusCode::SERVICE_UNAVAILABLE, &ErrorResponse::default());
        assert!(unavailable.is_transient());
    }

    #[test]
    fn test_bad_request_on_unseal_is_invalid_share() {
        let body = ErrorResponse::parse(r#"{"errors":["invalid key"]}"#);
        match classify_unseal_error(StatusCode::BAD_REQUEST, &body) {
            VaultError::InvalidShare(message) => assert_eq!(message, "invalid key"),
            other => panic!("unexpected classification: {other:?}"),
        }
        assert!(!classify_unseal_error(StatusCode::BAD_REQUEST, &body).is_transient());
    }

    #[test]
    fn test_server_error_on_unseal_is_transient() {
        let err = classify_unseal_error(StatusCode::INTERNAL_SERVER_ERROR, &ErrorResponse::default());
        assert!(err.is_transient());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = VaultHttpClient::new("http://vault:8200/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://vault:8200");
        assert_eq!(client.url("/v1/sys/init"), "http://vault:8200/v1/sys/init");
    }
}
