//! # Types
//!
//! Core types for the reconciler.

use crate::config::UnsealerConfig;
use crate::controller::key_material::CodecError;
use crate::provider::{SealStatus, SecretStore, SecretStoreError, VaultError, VaultGateway};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("Vault request failed: {0}")]
    Vault(#[from] VaultError),
    #[error("Secret store request failed: {0}")]
    SecretStore(#[from] SecretStoreError),
    #[error("Stored key material is unusable: {0}")]
    Codec(#[from] CodecError),
    /// Vault was initialized but at least one record could not be written.
    /// Vault-side initialization cannot be undone; an operator must reconcile.
    #[error(
        "Vault was initialized but key material was not fully persisted (root token: {}, shares: {})",
        persist_state(.root_token.as_ref()),
        persist_state(.shares.as_ref())
    )]
    KeyMaterialNotPersisted {
        root_token: Option<SecretStoreError>,
        shares: Option<SecretStoreError>,
    },
}

fn persist_state(err: Option<&SecretStoreError>) -> String {
    err.map_or_else(|| "saved".to_string(), ToString::to_string)
}

/// Vault state as last seen by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservedState {
    /// No successful status read yet, or the last read failed
    Unknown,
    NotInitialized,
    Sealed,
    Unsealed,
}

impl ObservedState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservedState::Unknown => "unknown",
            ObservedState::NotInitialized => "not-initialized",
            ObservedState::Sealed => "sealed",
            ObservedState::Unsealed => "unsealed",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            ObservedState::Unknown => 0,
            ObservedState::NotInitialized => 1,
            ObservedState::Sealed => 2,
            ObservedState::Unsealed => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => ObservedState::NotInitialized,
            2 => ObservedState::Sealed,
            3 => ObservedState::Unsealed,
            _ => ObservedState::Unknown,
        }
    }
}

impl From<SealStatus> for ObservedState {
    fn from(status: SealStatus) -> Self {
        match (status.initialized, status.sealed) {
            (false, _) => ObservedState::NotInitialized,
            (true, true) => ObservedState::Sealed,
            (true, false) => ObservedState::Unsealed,
        }
    }
}

/// Result of the initialize transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializeOutcome {
    /// Vault was initialized and both records were written
    Initialized { share_count: usize },
    /// Both records already exist; Vault was not asked to initialize
    AlreadyRecorded,
    /// Vault refused because another actor initialized it first
    AlreadyInitialized,
}

/// Result of the unseal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsealOutcome {
    /// Vault reported unsealed after `applied` shares
    Unsealed { applied: usize },
    /// Every stored share was tried and Vault is still sealed
    Exhausted { applied: usize, rejected: usize },
    /// The shares record does not exist
    SharesMissing,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Initialize(InitializeOutcome),
    Unseal(UnsealOutcome),
    /// Vault is initialized and unsealed
    Idle,
}

impl TickOutcome {
    /// Short label used in logs and metrics
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TickOutcome::Initialize(InitializeOutcome::Initialized { .. }) => "initialized",
            TickOutcome::Initialize(InitializeOutcome::AlreadyRecorded) => "already-recorded",
            TickOutcome::Initialize(InitializeOutcome::AlreadyInitialized) => "already-initialized",
            TickOutcome::Unseal(UnsealOutcome::Unsealed { .. }) => "unsealed",
            TickOutcome::Unseal(UnsealOutcome::Exhausted { .. }) => "shares-exhausted",
            TickOutcome::Unseal(UnsealOutcome::SharesMissing) => "shares-missing",
            TickOutcome::Idle => "idle",
        }
    }
}

/// Reconciler context
///
/// Holds the two gateways and the immutable configuration. Ticks are driven
/// one at a time by the poll loop.
pub struct Reconciler {
    pub(super) vault: Arc<dyn VaultGateway>,
    pub(super) store: Arc<dyn SecretStore>,
    pub(super) config: UnsealerConfig,
    observed: AtomicU8,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("observed", &self.observed_state())
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(
        vault: Arc<dyn VaultGateway>,
        store: Arc<dyn SecretStore>,
        config: UnsealerConfig,
    ) -> Self {
        Self {
            vault,
            store,
            config,
            observed: AtomicU8::new(ObservedState::Unknown.to_u8()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &UnsealerConfig {
        &self.config
    }

    /// Vault state as of the most recent tick
    #[must_use]
    pub fn observed_state(&self) -> ObservedState {
        ObservedState::from_u8(self.observed.load(Ordering::Relaxed))
    }

    pub(super) fn set_observed_state(&self, state: ObservedState) {
        self.observed.store(state.to_u8(), Ordering::Relaxed);
        crate::observability::metrics::set_observed_state(state);
    }
}
