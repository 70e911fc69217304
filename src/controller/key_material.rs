//! # Key Material
//!
//! Pure conversions between Vault key material and secret store records.
//!
//! Unseal shares are stored under `key0`, `key1`, ... in share order. Reading
//! them back yields a set: storage keys are an unordered map, and Vault does
//! not care in which order shares are applied.

use crate::constants::{ROOT_TOKEN_KEY, SHARE_KEY_PREFIX};
use crate::provider::SecretRecord;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Secret '{namespace}/{name}' contains no unseal shares")]
    NoShares { name: String, namespace: String },
    #[error("Secret '{namespace}/{name}' is missing key '{key}'")]
    MissingKey {
        name: String,
        namespace: String,
        key: String,
    },
}

/// Storage key for the share at `index`
#[must_use]
pub fn share_key(index: usize) -> String {
    format!("{SHARE_KEY_PREFIX}{index}")
}

/// Build the shares record, one key per share labelled with its position
#[must_use]
pub fn shares_to_record(shares: &[String], name: &str, namespace: &str) -> SecretRecord {
    let data: BTreeMap<String, String> = shares
        .iter()
        .enumerate()
        .map(|(index, share)| (share_key(index), share.clone()))
        .collect();
    SecretRecord::new(name, namespace, data)
}

/// Extract every share stored in a shares record
///
/// All values are returned regardless of key name.
///
/// # Errors
/// Returns `NoShares` if the record is empty
pub fn record_to_shares(record: &SecretRecord) -> Result<BTreeSet<String>, CodecError> {
    let shares: BTreeSet<String> = record
        .data
        .values()
        .filter(|v| !v.is_empty())
        .cloned()
        .collect();
    if shares.is_empty() {
        return Err(CodecError::NoShares {
            name: record.name.clone(),
            namespace: record.namespace.clone(),
        });
    }
    Ok(shares)
}

/// Build the root token record
#[must_use]
pub fn root_token_to_record(token: &str, name: &str, namespace: &str) -> SecretRecord {
    SecretRecord::new(
        name,
        namespace,
        BTreeMap::from([(ROOT_TOKEN_KEY.to_string(), token.to_string())]),
    )
}

/// Read the root token back out of its record
///
/// # Errors
/// Returns `MissingKey` if the record has no root token key
pub fn record_to_root_token(record: &SecretRecord) -> Result<String, CodecError> {
    record
        .data
        .get(ROOT_TOKEN_KEY)
        .cloned()
        .ok_or_else(|| CodecError::MissingKey {
            name: record.name.clone(),
            namespace: record.namespace.clone(),
            key: ROOT_TOKEN_KEY.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shares(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_shares_are_keyed_by_position() {
        let record = shares_to_record(&shares(&["a", "b", "c"]), "vault-keys", "default");
        assert_eq!(record.name, "vault-keys");
        assert_eq!(record.namespace, "default");
        assert_eq!(
            record.data,
            BTreeMap::from([
                ("key0".to_string(), "a".to_string()),
                ("key1".to_string(), "b".to_string()),
                ("key2".to_string(), "c".to_string()),
            ])
        );
    }

    #[test]
    fn test_round_trip_yields_same_set() {
        // More than ten shares so lexical key order differs from positional order
        let original: Vec<String> = (0..12).map(|i| format!("share-{i}")).collect();
        let record = shares_to_record(&original, "vault-keys", "default");
        let restored = record_to_shares(&record).unwrap();
        let expected: BTreeSet<String> = original.into_iter().collect();
        assert_eq!(restored, expected);
    }

    #[test]
    fn test_values_under_foreign_keys_are_included() {
        let record = SecretRecord::new(
            "vault-keys",
            "default",
            BTreeMap::from([
                ("key0".to_string(), "a".to_string()),
                ("Unseal Key 1".to_string(), "b".to_string()),
            ]),
        );
        let restored = record_to_shares(&record).unwrap();
        assert_eq!(restored.len(), 2);
        assert!(restored.contains("b"));
    }

    #[test]
    fn test_empty_record_has_no_shares() {
        let record = SecretRecord::new("vault-keys", "default", BTreeMap::new());
        assert_eq!(
            record_to_shares(&record),
            Err(CodecError::NoShares {
                name: "vault-keys".to_string(),
                namespace: "default".to_string()
            })
        );
    }

    #[test]
    fn test_root_token_round_trip() {
        let record = root_token_to_record("hvs.root", "vault-root-token", "default");
        assert_eq!(record.data.len(), 1);
        assert_eq!(record.data.get("rootToken").map(String::as_str), Some("hvs.root"));
        assert_eq!(record_to_root_token(&record).unwrap(), "hvs.root");
    }

    #[test]
    fn test_root_token_record_without_key() {
        let record = SecretRecord::new(
            "vault-root-token",
            "default",
            BTreeMap::from([("Initial Root Token".to_string(), "hvs.root".to_string())]),
        );
        assert!(matches!(
            record_to_root_token(&record),
            Err(CodecError::MissingKey { .. })
        ));
    }
}
