//! # Unsealer Configuration
//!
//! Immutable settings for the reconciler, built once at startup and passed
//! into [`crate::controller::reconciler::Reconciler::new`].

use super::{first_var_or_default, var_or_default};
use crate::constants::{
    DEFAULT_KEYS_SECRET, DEFAULT_NAMESPACE, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_ROOT_TOKEN_SECRET,
    DEFAULT_SECRET_SHARES, DEFAULT_SECRET_THRESHOLD, DEFAULT_VAULT_ADDR,
    DEFAULT_VAULT_REQUEST_TIMEOUT_SECS,
};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("secret threshold must be at least 1")]
    ZeroThreshold,
    #[error("secret threshold {threshold} exceeds secret shares {shares}")]
    ThresholdExceedsShares { shares: u32, threshold: u32 },
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("root token secret and keys secret must have different names (both are '{0}')")]
    SameSecretName(String),
}

/// Unsealer configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
/// Environment variables are populated from the sidecar container spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsealerConfig {
    /// Base URL of the Vault API (`VAULT_ADDR`, falling back to `VAULT_URL`)
    pub vault_addr: String,
    /// Namespace of the root token and keys secrets
    pub namespace: String,
    /// Name of the secret holding the root token
    pub root_token_secret: String,
    /// Name of the secret holding the unseal key shares
    pub keys_secret: String,
    /// Delay between seal status checks (seconds)
    pub poll_interval_secs: u64,
    /// Key shares requested on initialization
    pub secret_shares: u32,
    /// Key shares required to unseal
    pub secret_threshold: u32,
    /// Timeout applied to each Vault API request (seconds)
    pub vault_request_timeout_secs: u64,
}

impl Default for UnsealerConfig {
    fn default() -> Self {
        Self {
            vault_addr: DEFAULT_VAULT_ADDR.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            root_token_secret: DEFAULT_ROOT_TOKEN_SECRET.to_string(),
            keys_secret: DEFAULT_KEYS_SECRET.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            secret_shares: DEFAULT_SECRET_SHARES,
            secret_threshold: DEFAULT_SECRET_THRESHOLD,
            vault_request_timeout_secs: DEFAULT_VAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl UnsealerConfig {
    /// Load configuration from environment variables with defaults
    ///
    /// # Errors
    /// Returns an error if the resulting configuration is inconsistent
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if the resulting configuration is inconsistent
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            vault_addr: first_var_or_default(&lookup, &["VAULT_ADDR", "VAULT_URL"], DEFAULT_VAULT_ADDR)
                .trim_end_matches('/')
                .to_string(),
            namespace: first_var_or_default(&lookup, &["NAMESPACE", "POD_NAMESPACE"], DEFAULT_NAMESPACE),
            root_token_secret: first_var_or_default(
                &lookup,
                &["VAULT_ROOT_TOKEN_SECRET"],
                DEFAULT_ROOT_TOKEN_SECRET,
            ),
            keys_secret: first_var_or_default(&lookup, &["VAULT_KEYS_SECRET"], DEFAULT_KEYS_SECRET),
            poll_interval_secs: var_or_default(
                &lookup,
                "POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            ),
            secret_shares: var_or_default(&lookup, "VAULT_SECRET_SHARES", DEFAULT_SECRET_SHARES),
            secret_threshold: var_or_default(
                &lookup,
                "VAULT_SECRET_THRESHOLD",
                DEFAULT_SECRET_THRESHOLD,
            ),
            vault_request_timeout_secs: var_or_default(
                &lookup,
                "VAULT_REQUEST_TIMEOUT_SECS",
                DEFAULT_VAULT_REQUEST_TIMEOUT_SECS,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the share policy and cadence for internal consistency
    ///
    /// # Errors
    /// Returns the first inconsistency found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.secret_threshold > self.secret_shares {
            return Err(ConfigError::ThresholdExceedsShares {
                shares: self.secret_shares,
                threshold: self.secret_threshold,
            });
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.root_token_secret == self.keys_secret {
            return Err(ConfigError::SameSecretName(self.keys_secret.clone()));
        }
        Ok(())
    }

    /// Get poll interval duration
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get Vault request timeout duration
    #[must_use]
    pub fn vault_request_timeout(&self) -> Duration {
        Duration::from_secs(self.vault_request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<UnsealerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        UnsealerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = load(&[]).unwrap();
        assert_eq!(config, UnsealerConfig::default());
        assert_eq!(config.vault_addr, "http://localhost:8200");
        assert_eq!(config.namespace, "default");
        assert_eq!(config.root_token_secret, "vault-root-token");
        assert_eq!(config.keys_secret, "vault-keys");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_vault_url_is_used_when_vault_addr_is_unset() {
        let config = load(&[("VAULT_URL", "http://vault.vault.svc:8200/")]).unwrap();
        assert_eq!(config.vault_addr, "http://vault.vault.svc:8200");
    }

    #[test]
    fn test_vault_addr_takes_precedence_over_vault_url() {
        let config = load(&[
            ("VAULT_ADDR", "https://primary:8200"),
            ("VAULT_URL", "https://legacy:8200"),
        ])
        .unwrap();
        assert_eq!(config.vault_addr, "https://primary:8200");
    }

    #[test]
    fn test_pod_namespace_fallback() {
        let config = load(&[("POD_NAMESPACE", "vault")]).unwrap();
        assert_eq!(config.namespace, "vault");
    }

    #[test]
    fn test_unparseable_interval_uses_default() {
        let config = load(&[("POLL_INTERVAL_SECS", "five")]).unwrap();
        assert_eq!(config.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_threshold_above_shares_is_rejected() {
        let err = load(&[("VAULT_SECRET_SHARES", "3"), ("VAULT_SECRET_THRESHOLD", "5")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ThresholdExceedsShares {
                shares: 3,
                threshold: 5
            }
        );
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let err = load(&[("VAULT_SECRET_THRESHOLD", "0")]).unwrap_err();
        assert_eq!(err, ConfigError::ZeroThreshold);
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let err = load(&[("POLL_INTERVAL_SECS", "0")]).unwrap_err();
        assert_eq!(err, ConfigError::ZeroPollInterval);
    }

    #[test]
    fn test_same_secret_names_are_rejected() {
        let err = load(&[
            ("VAULT_ROOT_TOKEN_SECRET", "vault"),
            ("VAULT_KEYS_SECRET", "vault"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::SameSecretName("vault".to_string()));
    }
}
