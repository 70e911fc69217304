//! # Vault Operations
//!
//! Implementation of the `VaultGateway` trait for the Vault HTTP API.

use super::{
    classify_init_error, classify_unseal_error, transport_error, ErrorResponse, InitRequest,
    InitResponse, SealStatusResponse, UnsealRequest, VaultHttpClient,
};
use crate::observability::metrics;
use crate::provider::{InitializationResult, SealStatus, VaultError, VaultGateway};
use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};

const SEAL_STATUS_PATH: &str = "/v1/sys/seal-status";
const INIT_PATH: &str = "/v1/sys/init";
const UNSEAL_PATH: &str = "/v1/sys/unseal";

#[async_trait]
impl VaultGateway for VaultHttpClient {
    async fn get_seal_status(&self) -> Result<SealStatus, VaultError> {
        let span = tracing::debug_span!("vault.seal_status", vault.addr = self.base_url());
        async move {
            let start = Instant::now();
            let result: Result<SealStatus, VaultError> = async {
                let response = self
                    .http_client
                    .get(self.url(SEAL_STATUS_PATH))
                    .send()
                    .await
                    .map_err(|e| transport_error("seal status request", &e))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let error = ErrorResponse::parse(&response.text().await.unwrap_or_default());
                    return Err(VaultError::UnexpectedStatus {
                        status: status.as_u16(),
                        message: error.message(),
                    });
                }

                let body: SealStatusResponse = decode(response).await?;
                debug!(
                    vault.initialized = body.initialized,
                    vault.sealed = body.sealed,
                    vault.progress = body.progress,
                    vault.threshold = body.threshold,
                    "Fetched Vault seal status"
                );
                Ok(SealStatus {
                    initialized: body.initialized,
                    sealed: body.sealed,
                })
            }
            .await;
            metrics::record_vault_request("seal_status", result.is_ok(), start.elapsed());
            result
        }
        .instrument(span)
        .await
    }

    async fn initialize(
        &self,
        share_count: u32,
        threshold: u32,
    ) -> Result<InitializationResult, VaultError> {
        let span = info_span!(
            "vault.initialize",
            vault.addr = self.base_url(),
            vault.secret_shares = share_count,
            vault.secret_threshold = threshold
        );
        async move {
            let start = Instant::now();
            let result: Result<InitializationResult, VaultError> = async {
                info!("Initializing Vault...");
                let response = self
                    .http_client
                    .put(self.url(INIT_PATH))
                    .json(&InitRequest::new(share_count, threshold))
                    .send()
                    .await
                    .map_err(|e| transport_error("init request", &e))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let error = ErrorResponse::parse(&response.text().await.unwrap_or_default());
                    return Err(classify_init_error(status, &error));
                }

                let body: InitResponse = decode(response).await?;
                Ok(InitializationResult {
                    root_token: body.root_token.clone(),
                    shares: body.keys.clone(),
                })
            }
            .await;
            metrics::record_vault_request("initialize", result.is_ok(), start.elapsed());
            result
        }
        .instrument(span)
        .await
    }

    async fn unseal_one(&self, share: &str) -> Result<bool, VaultError> {
        let span = tracing::debug_span!("vault.unseal", vault.addr = self.base_url());
        async move {
            let start = Instant::now();
            let result: Result<bool, VaultError> = async {
                let response = self
                    .http_client
                    .put(self.url(UNSEAL_PATH))
                    .json(&UnsealRequest::new(share))
                    .send()
                    .await
                    .map_err(|e| transport_error("unseal request", &e))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let error = ErrorResponse::parse(&response.text().await.unwrap_or_default());
                    return Err(classify_unseal_error(status, &error));
                }

                let body: SealStatusResponse = decode(response).await?;
                debug!(
                    vault.sealed = body.sealed,
                    vault.progress = body.progress,
                    vault.threshold = body.threshold,
                    "Unseal share accepted"
                );
                Ok(body.sealed)
            }
            .await;
            metrics::record_vault_request("unseal", result.is_ok(), start.elapsed());
            result
        }
        .instrument(span)
        .await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, VaultError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error("reading response body", &e))?;
    serde_json::from_str(&text).map_err(|e| VaultError::UnexpectedStatus {
        status,
        message: format!("invalid response body: {e}"),
    })
}
