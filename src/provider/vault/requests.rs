//! # Request Types
//!
//! Request bodies for the Vault `sys/` endpoints.

use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Body of `PUT /v1/sys/init`
#[derive(Debug, Serialize)]
pub struct InitRequest {
    pub secret_shares: u32,
    pub secret_threshold: u32,
}

impl InitRequest {
    #[must_use]
    pub fn new(secret_shares: u32, secret_threshold: u32) -> Self {
        Self {
            secret_shares,
            secret_threshold,
        }
    }
}

/// Body of `PUT /v1/sys/unseal`
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
pub struct UnsealRequest {
    pub key: String,
}

impl UnsealRequest {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }
}

impl std::fmt::Debug for UnsealRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsealRequest").field("key", &"***").finish()
    }
}
