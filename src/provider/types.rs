//! # Gateway Types
//!
//! Values exchanged with the Vault and secret store gateways.

use std::collections::BTreeMap;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Snapshot of Vault's state for a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealStatus {
    pub initialized: bool,
    pub sealed: bool,
}

/// Key material returned by a successful initialization
///
/// Wiped from memory when dropped. Only the secret store keeps a copy.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct InitializationResult {
    pub root_token: String,
    pub shares: Vec<String>,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("root_token", &"***")
            .field("shares", &self.shares.len())
            .finish()
    }
}

/// A named, namespaced string map in the secret store
///
/// Values hold key material and are wiped when the record is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretRecord {
    pub name: String,
    pub namespace: String,
    pub data: BTreeMap<String, String>,
}

impl SecretRecord {
    #[must_use]
    pub fn new(name: &str, namespace: &str, data: BTreeMap<String, String>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            data,
        }
    }
}

impl Zeroize for SecretRecord {
    fn zeroize(&mut self) {
        for value in self.data.values_mut() {
            value.zeroize();
        }
        self.data.clear();
    }
}

impl Drop for SecretRecord {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SecretRecord {}

impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values are key material; only the keys are printed
        f.debug_struct("SecretRecord")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("keys", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}
