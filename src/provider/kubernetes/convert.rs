//! Conversions between `SecretRecord` and Kubernetes `Secret` objects.

use crate::constants::{MANAGED_BY_LABEL, MANAGED_BY_VALUE};
use crate::provider::{SecretRecord, SecretStoreError};
use k8s_openapi::api::core::v1::Secret;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

/// Build the `Secret` written for a record
#[must_use]
pub fn record_to_secret(record: &SecretRecord) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(record.name.clone()),
            namespace: Some(record.namespace.clone()),
            labels: Some(BTreeMap::from([(
                MANAGED_BY_LABEL.to_string(),
                MANAGED_BY_VALUE.to_string(),
            )])),
            ..Default::default()
        },
        type_: Some("Opaque".to_string()),
        string_data: Some(record.data.clone()),
        ..Default::default()
    }
}

/// Read a record out of a `Secret`
///
/// `data` wins over `stringData` for keys present in both.
///
/// # Errors
/// Returns `Malformed` if a `data` value is not valid UTF-8
pub fn secret_to_record(
    secret: &Secret,
    name: &str,
    namespace: &str,
) -> Result<SecretRecord, SecretStoreError> {
    let mut data = secret.string_data.clone().unwrap_or_default();

    if let Some(ref bytes_map) = secret.data {
        for (key, value) in bytes_map {
            let text = String::from_utf8(value.0.clone()).map_err(|e| SecretStoreError::Malformed {
                name: name.to_string(),
                namespace: namespace.to_string(),
                reason: format!("value of key '{key}' is not valid UTF-8: {e}"),
            })?;
            data.insert(key.clone(), text);
        }
    }

    Ok(SecretRecord::new(name, namespace, data))
}
