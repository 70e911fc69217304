//! # Gateway Errors
//!
//! Error taxonomy shared by gateway implementations and test doubles.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Vault is already initialized")]
    AlreadyInitialized,
    #[error("Vault rejected unseal share: {0}")]
    InvalidShare(String),
    #[error("Failed to reach Vault: {0}")]
    Connection(String),
    #[error("Unexpected Vault response (HTTP {status}): {message}")]
    UnexpectedStatus { status: u16, message: String },
}

impl VaultError {
    /// Whether the next poll may succeed without operator action
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::UnexpectedStatus { .. })
    }
}

#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("Secret '{namespace}/{name}' not found")]
    NotFound { name: String, namespace: String },
    #[error("Secret '{namespace}/{name}' already exists")]
    AlreadyExists { name: String, namespace: String },
    #[error("Secret '{namespace}/{name}' is malformed: {reason}")]
    Malformed {
        name: String,
        namespace: String,
        reason: String,
    },
    #[error("Failed to reach secret store: {0}")]
    Connection(String),
}

impl SecretStoreError {
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
