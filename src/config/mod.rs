//! # Configuration
//!
//! Unsealer and server settings loaded once from environment variables.
//!
//! - `unsealer`: Vault address, secret names, share policy and poll cadence
//! - `server`: Probe and metrics HTTP server settings

mod server;
mod unsealer;

pub use server::ServerConfig;
pub use unsealer::{ConfigError, UnsealerConfig};

/// Read a variable through `lookup` and parse it, falling back to `default`
/// when the variable is unset or unparseable
pub(crate) fn var_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a string variable through `lookup`, trying each key in order
pub(crate) fn first_var_or_default<F>(lookup: &F, keys: &[&str], default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| default.to_string())
}
