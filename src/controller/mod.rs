//! # Controller
//!
//! Core unsealer logic.
//!
//! - `key_material`: conversions between Vault key material and stored records
//! - `reconciler`: the seal-state reconciliation transitions
//! - `server`: HTTP server for metrics and probes

pub mod key_material;
pub mod reconciler;
pub mod server;
