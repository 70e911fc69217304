//! # Poll Loop
//!
//! Drives `Reconciler::tick` on a fixed interval until shutdown.
//!
//! Tick errors are logged and counted but never stop the loop; the next tick
//! starts again from a fresh seal status read.

use crate::controller::reconciler::Reconciler;
use crate::controller::server::ServerState;
use crate::observability::metrics;
use crate::runtime::shutdown::ShutdownSignal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, Instrument};

/// Run ticks every `interval` until `shutdown` is triggered
///
/// A tick in progress is allowed to finish; shutdown is only observed between
/// ticks. Returns the number of ticks run.
pub async fn run_poll_loop(
    reconciler: Arc<Reconciler>,
    interval: Duration,
    shutdown: ShutdownSignal,
) -> u64 {
    info!(interval_ms = interval.as_millis(), "Starting poll loop...");
    let mut ticks: u64 = 0;

    loop {
        if shutdown.is_triggered() {
            info!("Shutdown requested, exiting poll loop");
            break;
        }

        ticks += 1;
        let span = tracing::info_span!("unsealer.tick", tick = ticks);
        async {
            let start = Instant::now();
            let result = reconciler.tick().await;
            let elapsed = start.elapsed();

            metrics::increment_ticks();
            metrics::observe_tick_duration(elapsed);

            match result {
                Ok(outcome) => debug!(
                    outcome = outcome.as_str(),
                    observed = reconciler.observed_state().as_str(),
                    duration_ms = elapsed.as_millis(),
                    "Tick completed"
                ),
                Err(e) => {
                    metrics::increment_tick_errors();
                    error!(error = %e, duration_ms = elapsed.as_millis(), "Tick failed");
                }
            }
        }
        .instrument(span)
        .await;

        if shutdown.sleep_or_shutdown(interval).await {
            info!("Shutdown requested, exiting poll loop");
            break;
        }
    }

    info!(ticks, "Poll loop stopped");
    ticks
}

/// Trigger `shutdown` on SIGINT or SIGTERM
///
/// The server is marked not ready first so probes fail while the current
/// tick drains.
pub fn spawn_signal_handler(
    shutdown: ShutdownSignal,
    server_state: Arc<ServerState>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Received shutdown signal (SIGINT/SIGTERM), initiating graceful shutdown...");
        server_state.mark_not_ready();
        shutdown.trigger();
    })
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to install SIGTERM handler, only SIGINT will be honoured");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
