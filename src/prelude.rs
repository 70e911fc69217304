//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ```rust
//! use vault_unsealer::prelude::*;
//! ```

// Gateway traits and their data types
pub use crate::provider::{
    InitializationResult, SealStatus, SecretRecord, SecretStore, SecretStoreError, VaultError,
    VaultGateway,
};

// Reconciler types
pub use crate::controller::reconciler::{
    InitializeOutcome, ObservedState, Reconciler, ReconcilerError, TickOutcome, UnsealOutcome,
};

pub use crate::config::{ConfigError, ServerConfig, UnsealerConfig};
pub use crate::runtime::shutdown::ShutdownSignal;
