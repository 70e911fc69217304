//! # Metrics
//!
//! Prometheus metrics for monitoring the unsealer.
//!
//! ## Metrics Exposed
//!
//! - `vault_unsealer_ticks_total` - Total number of poll ticks
//! - `vault_unsealer_tick_errors_total` - Total number of ticks that ended in an error
//! - `vault_unsealer_tick_duration_seconds` - Duration of poll ticks
//! - `vault_unsealer_initializations_total` - Successful Vault initializations
//! - `vault_unsealer_persist_failures_total` - Initializations whose key material was not fully stored
//! - `vault_unsealer_shares_applied_total` - Unseal shares accepted by Vault
//! - `vault_unsealer_shares_rejected_total` - Unseal shares rejected by Vault
//! - `vault_unsealer_unseal_failures_total` - Unseal transitions that left Vault sealed, by reason
//! - `vault_unsealer_vault_initialized` / `vault_unsealer_vault_sealed` - Last observed Vault state
//! - `vault_unsealer_vault_requests_total` / `..._duration_seconds` - Vault API calls by operation and outcome
//! - `vault_unsealer_secret_store_requests_total` / `..._duration_seconds` - Secret store calls by operation and outcome

use crate::controller::reconciler::ObservedState;
use anyhow::Result;
use prometheus::{Histogram, HistogramVec, IntCounter, IntCounterVec, IntGauge, Registry};
use std::sync::LazyLock;
use std::time::Duration;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static TICKS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("vault_unsealer_ticks_total", "Total number of poll ticks")
        .expect("Failed to create TICKS_TOTAL metric - this should never happen")
});

static TICK_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "vault_unsealer_tick_errors_total",
        "Total number of poll ticks that ended in an error",
    )
    .expect("Failed to create TICK_ERRORS_TOTAL metric - this should never happen")
});

static TICK_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "vault_unsealer_tick_duration_seconds",
            "Duration of poll ticks in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
    )
    .expect("Failed to create TICK_DURATION metric - this should never happen")
});

static INITIALIZATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "vault_unsealer_initializations_total",
        "Total number of successful Vault initializations",
    )
    .expect("Failed to create INITIALIZATIONS_TOTAL metric - this should never happen")
});

static PERSIST_FAILURES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "vault_unsealer_persist_failures_total",
        "Total number of initializations whose key material was not fully stored",
    )
    .expect("Failed to create PERSIST_FAILURES_TOTAL metric - this should never happen")
});

static SHARES_APPLIED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "vault_unsealer_shares_applied_total",
        "Total number of unseal shares accepted by Vault",
    )
    .expect("Failed to create SHARES_APPLIED_TOTAL metric - this should never happen")
});

static SHARES_REJECTED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "vault_unsealer_shares_rejected_total",
        "Total number of unseal shares rejected by Vault",
    )
    .expect("Failed to create SHARES_REJECTED_TOTAL metric - this should never happen")
});

static UNSEAL_FAILURES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "vault_unsealer_unseal_failures_total",
            "Total number of unseal attempts that left Vault sealed by reason",
        ),
        &["reason"],
    )
    .expect("Failed to create UNSEAL_FAILURES_TOTAL metric - this should never happen")
});

static VAULT_INITIALIZED: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "vault_unsealer_vault_initialized",
        "Whether Vault was initialized at the last poll (1) or not (0), -1 if unknown",
    )
    .expect("Failed to create VAULT_INITIALIZED metric - this should never happen")
});

static VAULT_SEALED: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "vault_unsealer_vault_sealed",
        "Whether Vault was sealed at the last poll (1) or not (0), -1 if unknown",
    )
    .expect("Failed to create VAULT_SEALED metric - this should never happen")
});

static VAULT_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "vault_unsealer_vault_requests_total",
            "Total number of Vault API requests by operation and outcome",
        ),
        &["operation", "outcome"],
    )
    .expect("Failed to create VAULT_REQUESTS_TOTAL metric - this should never happen")
});

static VAULT_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "vault_unsealer_vault_request_duration_seconds",
            "Duration of Vault API requests in seconds by operation",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["operation"],
    )
    .expect("Failed to create VAULT_REQUEST_DURATION metric - this should never happen")
});

static SECRET_STORE_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "vault_unsealer_secret_store_requests_total",
            "Total number of secret store requests by operation and outcome",
        ),
        &["operation", "outcome"],
    )
    .expect("Failed to create SECRET_STORE_REQUESTS_TOTAL metric - this should never happen")
});

static SECRET_STORE_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "vault_unsealer_secret_store_request_duration_seconds",
            "Duration of secret store requests in seconds by operation",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["operation"],
    )
    .expect("Failed to create SECRET_STORE_REQUEST_DURATION metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Registration only fails if called twice"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(TICKS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(TICK_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(TICK_DURATION.clone()))?;
    REGISTRY.register(Box::new(INITIALIZATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(PERSIST_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SHARES_APPLIED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SHARES_REJECTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(UNSEAL_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(VAULT_INITIALIZED.clone()))?;
    REGISTRY.register(Box::new(VAULT_SEALED.clone()))?;
    REGISTRY.register(Box::new(VAULT_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(VAULT_REQUEST_DURATION.clone()))?;
    REGISTRY.register(Box::new(SECRET_STORE_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRET_STORE_REQUEST_DURATION.clone()))?;

    Ok(())
}

pub fn increment_ticks() {
    TICKS_TOTAL.inc();
}

pub fn increment_tick_errors() {
    TICK_ERRORS_TOTAL.inc();
}

pub fn observe_tick_duration(duration: Duration) {
    TICK_DURATION.observe(duration.as_secs_f64());
}

pub fn increment_initializations() {
    INITIALIZATIONS_TOTAL.inc();
}

pub fn increment_persist_failures() {
    PERSIST_FAILURES_TOTAL.inc();
}

pub fn increment_shares_applied() {
    SHARES_APPLIED_TOTAL.inc();
}

pub fn increment_shares_rejected() {
    SHARES_REJECTED_TOTAL.inc();
}

pub fn increment_unseal_failures(reason: &str) {
    UNSEAL_FAILURES_TOTAL.with_label_values(&[reason]).inc();
}

pub fn set_observed_state(state: ObservedState) {
    let (initialized, sealed) = match state {
        ObservedState::Unknown => (-1, -1),
        ObservedState::NotInitialized => (0, 1),
        ObservedState::Sealed => (1, 1),
        ObservedState::Unsealed => (1, 0),
    };
    VAULT_INITIALIZED.set(initialized);
    VAULT_SEALED.set(sealed);
}

pub fn record_vault_request(operation: &str, success: bool, duration: Duration) {
    VAULT_REQUESTS_TOTAL
        .with_label_values(&[operation, outcome_label(success)])
        .inc();
    VAULT_REQUEST_DURATION
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
}

pub fn record_secret_store_request(operation: &str, success: bool, duration: Duration) {
    SECRET_STORE_REQUESTS_TOTAL
        .with_label_values(&[operation, outcome_label(success)])
        .inc();
    SECRET_STORE_REQUEST_DURATION
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
}

fn outcome_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}
