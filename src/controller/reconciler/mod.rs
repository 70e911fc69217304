//! # Reconciler
//!
//! The state machine that keeps Vault initialized and unsealed.
//!
//! Each tick observes Vault's seal status and performs at most one transition:
//! - `initialize`: first-time initialization and persistence of key material
//! - `unseal`: applying stored shares until Vault reports unsealed
//!
//! Scheduling (the poll interval and shutdown) lives in `runtime::poll_loop`.

mod initialize;
mod reconcile;
mod types;
mod unseal;

pub use types::{
    InitializeOutcome, ObservedState, Reconciler, ReconcilerError, TickOutcome, UnsealOutcome,
};
