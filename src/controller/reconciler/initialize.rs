//! # Initialize Transition
//!
//! First-time Vault initialization and persistence of the resulting key material.
//!
//! Safe to run redundantly: existing records are never overwritten, and a
//! Vault that was initialized by someone else is left alone.

use super::types::{InitializeOutcome, Reconciler, ReconcilerError};
use crate::controller::key_material::{root_token_to_record, shares_to_record};
use crate::observability::metrics;
use crate::provider::VaultError;
use tracing::{error, info, warn};

impl Reconciler {
    /// Initialize Vault and store its root token and unseal shares
    ///
    /// # Errors
    /// Returns an error when a gateway call fails, or when Vault was
    /// initialized but one or both records could not be created. In the
    /// latter case nothing is rolled back.
    pub async fn initialize(&self) -> Result<InitializeOutcome, ReconcilerError> {
        let namespace = self.config.namespace.as_str();
        let root_token_secret = self.config.root_token_secret.as_str();
        let keys_secret = self.config.keys_secret.as_str();

        let (root_token_exists, keys_exist) = tokio::join!(
            self.store.exists(root_token_secret, namespace),
            self.store.exists(keys_secret, namespace)
        );
        let (root_token_exists, keys_exist) = (root_token_exists?, keys_exist?);

        if root_token_exists && keys_exist {
            warn!(
                secret.namespace = namespace,
                root_token_secret, keys_secret,
                "Vault reports not initialized but key material secrets already exist, skipping initialization"
            );
            return Ok(InitializeOutcome::AlreadyRecorded);
        }
        if root_token_exists || keys_exist {
            warn!(
                secret.namespace = namespace,
                root_token_secret_exists = root_token_exists,
                keys_secret_exists = keys_exist,
                "Only one key material secret exists; it will not be overwritten"
            );
        }

        info!("Vault is not initialized, initializing...");
        let init = match self
            .vault
            .initialize(self.config.secret_shares, self.config.secret_threshold)
            .await
        {
            Ok(init) => init,
            Err(VaultError::AlreadyInitialized) => {
                info!("Vault was already initialized by another actor, skipping");
                return Ok(InitializeOutcome::AlreadyInitialized);
            }
            Err(e) => return Err(e.into()),
        };

        let share_count = init.shares.len();
        info!(shares = share_count, "Vault has been initialized");
        metrics::increment_initializations();

        let root_token_record = root_token_to_record(&init.root_token, root_token_secret, namespace);
        let keys_record = shares_to_record(&init.shares, keys_secret, namespace);
        drop(init);

        info!("Saving root token and keys...");
        let (root_token_result, keys_result) = tokio::join!(
            self.store.create(&root_token_record),
            self.store.create(&keys_record)
        );

        match (root_token_result, keys_result) {
            (Ok(()), Ok(())) => {
                info!(
                    secret.namespace = namespace,
                    root_token_secret, keys_secret, "Root token and keys saved"
                );
                Ok(InitializeOutcome::Initialized { share_count })
            }
            (root_token_result, keys_result) => {
                let root_token = root_token_result.err();
                let shares = keys_result.err();
                if let Some(ref e) = root_token {
                    error!(secret.name = root_token_secret, secret.namespace = namespace, error = %e, "Failed to save root token");
                }
                if let Some(ref e) = shares {
                    error!(secret.name = keys_secret, secret.namespace = namespace, error = %e, "Failed to save unseal keys");
                }
                error!("Vault is initialized but its key material is not fully stored; manual intervention required");
                metrics::increment_persist_failures();
                Err(ReconcilerError::KeyMaterialNotPersisted { root_token, shares })
            }
        }
    }
}
