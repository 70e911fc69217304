//! # Response Types
//!
//! Response bodies from the Vault `sys/` endpoints. Unknown fields are ignored.

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Body of `GET /v1/sys/seal-status` and `PUT /v1/sys/unseal`
#[derive(Debug, Deserialize)]
pub struct SealStatusResponse {
    #[serde(default)]
    pub initialized: bool,
    pub sealed: bool,
    /// Shares required to unseal (`t`)
    #[serde(default, rename = "t")]
    pub threshold: u32,
    /// Shares supplied towards the current unseal attempt
    #[serde(default)]
    pub progress: u32,
}

/// Body of `PUT /v1/sys/init`
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct InitResponse {
    #[serde(default)]
    pub keys: Vec<String>,
    pub root_token: String,
}

impl std::fmt::Debug for InitResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitResponse")
            .field("keys", &self.keys.len())
            .field("root_token", &"***")
            .finish()
    }
}

/// Error body returned by Vault for non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ErrorResponse {
    /// Parse an error body, keeping the raw text when it is not Vault's JSON shape
    #[must_use]
    pub fn parse(body: &str) -> Self {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|e| !e.errors.is_empty())
            .unwrap_or_else(|| Self {
                errors: if body.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![body.trim().to_string()]
                },
            })
    }

    #[must_use]
    pub fn message(&self) -> String {
        if self.errors.is_empty() {
            "no error details".to_string()
        } else {
            self.errors.join("; ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_status_parses_vault_body() {
        let body = r#"{"type":"shamir","initialized":true,"sealed":true,"t":3,"n":5,"progress":1,"nonce":"abc","version":"1.15.2","build_date":"2023-11-06T11:33:28Z","migration":false,"recovery_seal":false,"storage_type":"raft"}"#;
        let status: SealStatusResponse = serde_json::from_str(body).unwrap();
        assert!(status.initialized);
        assert!(status.sealed);
        assert_eq!(status.threshold, 3);
        assert_eq!(status.progress, 1);
    }

    #[test]
    fn test_init_response_parses_keys_and_token() {
        let body = r#"{"keys":["k1","k2"],"keys_base64":["a2V5MQ==","a2V5Mg=="],"root_token":"hvs.root"}"#;
        let init: InitResponse = serde_json::from_str(body).unwrap();
        assert_eq!(init.keys, vec!["k1", "k2"]);
        assert_eq!(init.root_token, "hvs.root");
    }

    #[test]
    fn test_error_response_joins_messages() {
        let err = ErrorResponse::parse(r#"{"errors":["Vault is already initialized"]}"#);
        assert_eq!(err.message(), "Vault is already initialized");
    }

    #[test]
    fn test_error_response_keeps_non_json_body() {
        let err = ErrorResponse::parse("upstream connect error");
        assert_eq!(err.message(), "upstream connect error");
        assert_eq!(ErrorResponse::parse("  ").message(), "no error details");
    }
}
