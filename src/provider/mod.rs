//! # Provider Modules
//!
//! Gateways to the two external systems the unsealer drives.
//!
//! Each backend implements one of:
//! - `VaultGateway` trait for the Vault seal/init control API
//! - `SecretStore` trait for the namespaced secret store holding key material
//!
//! Gateways never retry; failures propagate to the reconciler, whose poll
//! loop is the retry policy.

use async_trait::async_trait;

mod errors;
mod types;

pub use errors::{SecretStoreError, VaultError};
pub use types::{InitializationResult, SealStatus, SecretRecord};

/// Gateway trait for the Vault control API
#[async_trait]
pub trait VaultGateway: Send + Sync {
    /// Fetch the current initialization and seal state
    async fn get_seal_status(&self) -> Result<SealStatus, VaultError>;

    /// Initialize Vault, generating the root token and `share_count` unseal shares
    ///
    /// # Arguments
    /// * `share_count` - Number of key shares to split the master key into
    /// * `threshold` - Number of shares required to unseal (must be <= `share_count`)
    async fn initialize(
        &self,
        share_count: u32,
        threshold: u32,
    ) -> Result<InitializationResult, VaultError>;

    /// Submit a single unseal share
    /// Returns true if Vault is still sealed after accepting the share
    async fn unseal_one(&self, share: &str) -> Result<bool, VaultError>;
}

/// Gateway trait for the secret store holding root token and unseal shares
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Check whether a record exists
    async fn exists(&self, name: &str, namespace: &str) -> Result<bool, SecretStoreError>;

    /// Read a record
    async fn get(&self, name: &str, namespace: &str) -> Result<SecretRecord, SecretStoreError>;

    /// Create a record; fails with `AlreadyExists` without modifying an existing one
    async fn create(&self, record: &SecretRecord) -> Result<(), SecretStoreError>;
}

// Provider implementations
pub mod kubernetes;
pub mod vault;
