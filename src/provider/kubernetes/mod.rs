//! # Kubernetes Secret Store
//!
//! `SecretStore` implementation backed by Kubernetes `Secret` resources.
//!
//! Records are written as `Opaque` secrets through `stringData`; the API
//! server stores them base64-encoded under `data`, which is what reads return.

mod convert;

pub use convert::{record_to_secret, secret_to_record};

use crate::observability::metrics;
use crate::provider::{SecretRecord, SecretStore, SecretStoreError};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::PostParams;
use kube::{Api, Client};
use std::time::Instant;
use tracing::{debug, info, Instrument};

/// Secret store over the Kubernetes API
#[derive(Clone)]
pub struct KubernetesSecretStore {
    client: Client,
}

impl std::fmt::Debug for KubernetesSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubernetesSecretStore").finish_non_exhaustive()
    }
}

impl KubernetesSecretStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl SecretStore for KubernetesSecretStore {
    async fn exists(&self, name: &str, namespace: &str) -> Result<bool, SecretStoreError> {
        let span = tracing::debug_span!(
            "kubernetes.secret.exists",
            secret.name = name,
            secret.namespace = namespace
        );
        async move {
            let start = Instant::now();
            let result = match self.secrets(namespace).get(name).await {
                Ok(_) => Ok(true),
                Err(kube::Error::Api(api_err)) if api_err.code == 404 => Ok(false),
                Err(e) => Err(classify_kube_error(&e, name, namespace)),
            };
            metrics::record_secret_store_request("exists", result.is_ok(), start.elapsed());
            debug!(exists = ?result.as_ref().ok(), "Checked secret existence");
            result
        }
        .instrument(span)
        .await
    }

    async fn get(&self, name: &str, namespace: &str) -> Result<SecretRecord, SecretStoreError> {
        let span = tracing::debug_span!(
            "kubernetes.secret.get",
            secret.name = name,
            secret.namespace = namespace
        );
        async move {
            let start = Instant::now();
            let result = match self.secrets(namespace).get(name).await {
                Ok(secret) => secret_to_record(&secret, name, namespace),
                Err(e) => Err(classify_kube_error(&e, name, namespace)),
            };
            metrics::record_secret_store_request("get", result.is_ok(), start.elapsed());
            result
        }
        .instrument(span)
        .await
    }

    async fn create(&self, record: &SecretRecord) -> Result<(), SecretStoreError> {
        let span = tracing::info_span!(
            "kubernetes.secret.create",
            secret.name = record.name.as_str(),
            secret.namespace = record.namespace.as_str(),
            secret.keys = record.data.len()
        );
        async move {
            let start = Instant::now();
            let secret = record_to_secret(record);
            let result = match self
                .secrets(&record.namespace)
                .create(&PostParams::default(), &secret)
                .await
            {
                Ok(_) => {
                    info!("Created secret");
                    Ok(())
                }
                Err(e) => Err(classify_kube_error(&e, &record.name, &record.namespace)),
            };
            metrics::record_secret_store_request("create", result.is_ok(), start.elapsed());
            result
        }
        .instrument(span)
        .await
    }
}

fn classify_kube_error(err: &kube::Error, name: &str, namespace: &str) -> SecretStoreError {
    match err {
        kube::Error::Api(api_err) => classify_status_code(api_err.code, name, namespace, &err.to_string()),
        other => SecretStoreError::Connection(other.to_string()),
    }
}

/// Map a Kubernetes API status code to the gateway taxonomy
fn classify_status_code(code: u16, name: &str, namespace: &str, message: &str) -> SecretStoreError {
    match code {
        404 => SecretStoreError::NotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        },
        409 => SecretStoreError::AlreadyExists {
            name: name.to_string(),
            namespace: namespace.to_string(),
        },
        _ => SecretStoreError::Connection(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_conflict_codes() {
        assert!(classify_status_code(404, "vault-keys", "default", "").is_not_found());
        assert!(classify_status_code(409, "vault-keys", "default", "").is_already_exists());
    }

    #[test]
    fn test_forbidden_is_a_connection_error() {
        match classify_status_code(403, "vault-keys", "default", "secrets is forbidden") {
            SecretStoreError::Connection(message) => assert_eq!(message, "secrets is forbidden"),
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
