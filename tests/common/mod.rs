//! Common test utilities for integration and Pact tests
//!
//! Provides rustls crypto provider setup plus in-process stand-ins for the
//! Vault and secret store gateways.

#![allow(dead_code, reason = "Each test binary uses a different subset")]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use vault_unsealer::config::UnsealerConfig;
use vault_unsealer::provider::{
    InitializationResult, SealStatus, SecretRecord, SecretStore, SecretStoreError, VaultError,
    VaultGateway,
};

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` to ensure it's only called once across all tests.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        // Matches the provider installed by the binary at startup
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}

pub const NAMESPACE: &str = "vault";
pub const ROOT_TOKEN_SECRET: &str = "vault-root-token";
pub const KEYS_SECRET: &str = "vault-keys";

/// Configuration pointing at the fake gateways
pub fn test_config() -> UnsealerConfig {
    UnsealerConfig {
        namespace: NAMESPACE.to_string(),
        root_token_secret: ROOT_TOKEN_SECRET.to_string(),
        keys_secret: KEYS_SECRET.to_string(),
        ..UnsealerConfig::default()
    }
}

/// A single call observed by `FakeVault`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultCall {
    SealStatus,
    Initialize { share_count: u32, threshold: u32 },
    Unseal(String),
}

#[derive(Debug)]
struct FakeVaultState {
    initialized: bool,
    sealed: bool,
    valid_shares: Vec<String>,
    threshold: usize,
    accepted: HashSet<String>,
}

/// In-memory Vault that follows the Shamir unseal protocol
///
/// `initialize` generates `share-0`, `share-1`, ... and the token
/// `root-token`. Unsealing needs `threshold` distinct valid shares; anything
/// else is rejected as an invalid share.
#[derive(Debug)]
pub struct FakeVault {
    state: Mutex<FakeVaultState>,
    calls: Mutex<Vec<VaultCall>>,
    fail_seal_status: AtomicBool,
    yield_on_status: AtomicBool,
}

impl FakeVault {
    pub fn uninitialized() -> Self {
        Self::with_state(FakeVaultState {
            initialized: false,
            sealed: true,
            valid_shares: Vec::new(),
            threshold: 0,
            accepted: HashSet::new(),
        })
    }

    pub fn sealed_with(valid_shares: &[&str], threshold: usize) -> Self {
        Self::with_state(FakeVaultState {
            initialized: true,
            sealed: true,
            valid_shares: valid_shares.iter().map(|s| (*s).to_string()).collect(),
            threshold,
            accepted: HashSet::new(),
        })
    }

    fn with_state(state: FakeVaultState) -> Self {
        Self {
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
            fail_seal_status: AtomicBool::new(false),
            yield_on_status: AtomicBool::new(false),
        }
    }

    /// Make every seal status read fail with a connection error
    pub fn set_unreachable(&self, unreachable: bool) {
        self.fail_seal_status.store(unreachable, Ordering::SeqCst);
    }

    /// Yield to the scheduler after each seal status read so concurrent
    /// ticks interleave
    pub fn yield_after_status(&self) {
        self.yield_on_status.store(true, Ordering::SeqCst);
    }

    /// Put an unsealed Vault back into the sealed state
    pub fn seal(&self) {
        let mut state = self.state.lock().unwrap();
        state.sealed = true;
        state.accepted.clear();
    }

    pub fn is_sealed(&self) -> bool {
        self.state.lock().unwrap().sealed
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().unwrap().initialized
    }

    pub fn calls(&self) -> Vec<VaultCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn initialize_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, VaultCall::Initialize { .. }))
            .count()
    }

    pub fn unseal_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                VaultCall::Unseal(share) => Some(share),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: VaultCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VaultGateway for FakeVault {
    async fn get_seal_status(&self) -> Result<SealStatus, VaultError> {
        self.record(VaultCall::SealStatus);
        if self.fail_seal_status.load(Ordering::SeqCst) {
            return Err(VaultError::Connection("connection refused".to_string()));
        }
        let status = {
            let state = self.state.lock().unwrap();
            SealStatus {
                initialized: state.initialized,
                sealed: state.sealed,
            }
        };
        if self.yield_on_status.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        Ok(status)
    }

    async fn initialize(
        &self,
        share_count: u32,
        threshold: u32,
    ) -> Result<InitializationResult, VaultError> {
        self.record(VaultCall::Initialize {
            share_count,
            threshold,
        });
        let mut state = self.state.lock().unwrap();
        if state.initialized {
            return Err(VaultError::AlreadyInitialized);
        }
        state.initialized = true;
        state.sealed = true;
        state.valid_shares = (0..share_count).map(|i| format!("share-{i}")).collect();
        state.threshold = threshold as usize;
        Ok(InitializationResult {
            root_token: "root-token".to_string(),
            shares: state.valid_shares.clone(),
        })
    }

    async fn unseal_one(&self, share: &str) -> Result<bool, VaultError> {
        self.record(VaultCall::Unseal(share.to_string()));
        let mut state = self.state.lock().unwrap();
        if !state.valid_shares.iter().any(|s| s == share) {
            return Err(VaultError::InvalidShare("invalid key".to_string()));
        }
        if !state.sealed {
            return Ok(false);
        }
        state.accepted.insert(share.to_string());
        if state.accepted.len() >= state.threshold {
            state.sealed = false;
            state.accepted.clear();
        }
        Ok(state.sealed)
    }
}

/// In-memory secret store keyed by namespace and name
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    records: Mutex<BTreeMap<(String, String), SecretRecord>>,
    failing_creates: Mutex<HashSet<String>>,
    exists_calls: AtomicUsize,
    get_calls: AtomicUsize,
    create_calls: AtomicUsize,
    created: Mutex<Vec<String>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: SecretRecord) {
        self.records
            .lock()
            .unwrap()
            .insert((record.namespace.clone(), record.name.clone()), record);
    }

    pub fn record(&self, name: &str, namespace: &str) -> Option<SecretRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Make every `create` of `name` fail with a connection error
    pub fn fail_creates_of(&self, name: &str) {
        self.failing_creates.lock().unwrap().insert(name.to_string());
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Names of the records this store successfully created, in order
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn exists(&self, name: &str, namespace: &str) -> Result<bool, SecretStoreError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.record(name, namespace).is_some())
    }

    async fn get(&self, name: &str, namespace: &str) -> Result<SecretRecord, SecretStoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.record(name, namespace)
            .ok_or_else(|| SecretStoreError::NotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            })
    }

    async fn create(&self, record: &SecretRecord) -> Result<(), SecretStoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_creates.lock().unwrap().contains(&record.name) {
            return Err(SecretStoreError::Connection(format!(
                "injected failure creating '{}'",
                record.name
            )));
        }
        let mut records = self.records.lock().unwrap();
        let key = (record.namespace.clone(), record.name.clone());
        if records.contains_key(&key) {
            return Err(SecretStoreError::AlreadyExists {
                name: record.name.clone(),
                namespace: record.namespace.clone(),
            });
        }
        records.insert(key, record.clone());
        self.created.lock().unwrap().push(record.name.clone());
        Ok(())
    }
}
