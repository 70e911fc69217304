//! # Runtime
//!
//! Process lifecycle for the unsealer.
//!
//! - `initialization`: crypto provider, tracing, metrics, HTTP server and gateway setup
//! - `poll_loop`: the periodic reconciliation loop
//! - `shutdown`: cooperative shutdown signal shared by the loop and signal handlers

pub mod initialization;
pub mod poll_loop;
pub mod shutdown;
