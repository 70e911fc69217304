//! # Initialization
//!
//! Unsealer startup: rustls setup, tracing, metrics, server startup,
//! configuration and gateway construction.

use crate::config::{ServerConfig, UnsealerConfig};
use crate::controller::reconciler::Reconciler;
use crate::controller::server::{start_server, ServerState};
use crate::observability;
use crate::observability::logging::LogFormat;
use crate::provider::kubernetes::KubernetesSecretStore;
use crate::provider::vault::VaultHttpClient;
use anyhow::{Context, Result};
use kube::Client;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};

/// Everything the poll loop needs once startup has finished
pub struct InitializationResult {
    pub reconciler: Arc<Reconciler>,
    pub server_state: Arc<ServerState>,
    pub config: UnsealerConfig,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("config", &self.config)
            .field("server_ready", &self.server_state.is_ready.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Initialize the unsealer runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Metrics registration
/// - Configuration loading and validation
/// - HTTP server startup
/// - Kubernetes client and Vault client creation
pub async fn initialize() -> Result<InitializationResult> {
    // Must run before any client that uses rustls is built
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        anyhow::bail!("Failed to install rustls crypto provider");
    }

    observability::logging::init_tracing(LogFormat::from_env())?;

    info!("Starting Vault unsealer");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    observability::metrics::register_metrics()?;

    let config = UnsealerConfig::from_env().context("Invalid unsealer configuration")?;
    let server_config = ServerConfig::from_env();
    info!(
        vault.addr = config.vault_addr.as_str(),
        secret.namespace = config.namespace.as_str(),
        root_token_secret = config.root_token_secret.as_str(),
        keys_secret = config.keys_secret.as_str(),
        secret_shares = config.secret_shares,
        secret_threshold = config.secret_threshold,
        poll_interval_secs = config.poll_interval_secs,
        "Loaded configuration"
    );

    let server_state = Arc::new(ServerState::new());
    let server_state_clone = Arc::clone(&server_state);
    let server_port = server_config.metrics_port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });
    wait_for_server_ready(&server_state, &server_handle, &server_config).await?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    let store = Arc::new(KubernetesSecretStore::new(client));
    let vault = Arc::new(
        VaultHttpClient::new(&config.vault_addr, config.vault_request_timeout())
            .context("Failed to create Vault client")?,
    );

    let reconciler = Arc::new(Reconciler::new(vault, store, config.clone()));
    info!("Unsealer initialized, starting poll loop...");

    Ok(InitializationResult {
        reconciler,
        server_state,
        config,
    })
}

/// Wait for the HTTP server to become ready
async fn wait_for_server_ready(
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
    server_config: &ServerConfig,
) -> Result<()> {
    let startup_timeout = server_config.startup_timeout();
    let poll_interval = server_config.poll_interval();
    let start_time = std::time::Instant::now();

    loop {
        if server_handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        // Set by start_server once bound
        if server_state.is_ready.load(Ordering::Relaxed) {
            info!("HTTP server is ready and accepting connections");
            break;
        }

        if start_time.elapsed() > startup_timeout {
            return Err(anyhow::anyhow!(
                "HTTP server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }

    Ok(())
}
