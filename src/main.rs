//! # Vault Unsealer
//!
//! Sidecar that keeps a HashiCorp Vault server initialized and unsealed,
//! storing its root token and unseal shares in Kubernetes Secrets.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use vault_unsealer::runtime::initialization::initialize;
use vault_unsealer::runtime::poll_loop::{run_poll_loop, spawn_signal_handler};
use vault_unsealer::runtime::shutdown::ShutdownSignal;

#[tokio::main]
async fn main() -> Result<()> {
    let init = initialize().await?;

    let shutdown = ShutdownSignal::new();
    spawn_signal_handler(shutdown.clone(), Arc::clone(&init.server_state));

    run_poll_loop(init.reconciler, init.config.poll_interval(), shutdown).await;

    info!("Vault unsealer stopped");
    Ok(())
}
