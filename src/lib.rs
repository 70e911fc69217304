//! # Vault Unsealer
//!
//! Keeps a HashiCorp Vault server initialized and unsealed.
//!
//! On every poll tick the reconciler reads Vault's seal status. An
//! uninitialized Vault is initialized and its root token and unseal shares
//! are written to two Kubernetes Secrets; a sealed Vault is unsealed by
//! applying the stored shares one at a time.
//!
//! ## Modules
//!
//! - `config`: environment-driven configuration
//! - `controller`: key material conversions, the reconciler and the HTTP server
//! - `observability`: metrics and logging
//! - `provider`: the Vault and secret store gateways
//! - `runtime`: startup, the poll loop and shutdown

pub mod config;
pub mod constants;
pub mod controller;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod runtime;
