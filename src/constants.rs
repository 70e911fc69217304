//! # Constants
//!
//! Shared constants used throughout the unsealer.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable.

/// Default Vault API address
pub const DEFAULT_VAULT_ADDR: &str = "http://localhost:8200";

/// Default namespace holding the root token and unseal key secrets
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default name of the secret holding the initial root token
pub const DEFAULT_ROOT_TOKEN_SECRET: &str = "vault-root-token";

/// Default name of the secret holding the unseal key shares
pub const DEFAULT_KEYS_SECRET: &str = "vault-keys";

/// Default interval between seal status checks (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Number of key shares requested when initializing Vault
pub const DEFAULT_SECRET_SHARES: u32 = 5;

/// Number of key shares required to unseal Vault
pub const DEFAULT_SECRET_THRESHOLD: u32 = 3;

/// Default timeout for a single Vault API request (seconds)
pub const DEFAULT_VAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Key prefix for unseal shares in the keys secret (`key0`, `key1`, ...)
pub const SHARE_KEY_PREFIX: &str = "key";

/// Key holding the root token in the root token secret
pub const ROOT_TOKEN_KEY: &str = "rootToken";

/// Label applied to every secret created by the unsealer
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Value of [`MANAGED_BY_LABEL`]
pub const MANAGED_BY_VALUE: &str = "vault-unsealer";

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 5000;

/// Default HTTP server startup timeout (how long to wait for server to be ready)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Default HTTP server readiness poll interval
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;
