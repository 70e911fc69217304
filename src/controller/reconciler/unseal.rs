//! # Unseal Transition
//!
//! Applies the stored unseal shares one at a time until Vault reports unsealed.

use super::types::{ObservedState, Reconciler, ReconcilerError, UnsealOutcome};
use crate::controller::key_material::record_to_shares;
use crate::observability::metrics;
use crate::provider::{SecretStoreError, VaultError};
use tracing::{debug, error, info, warn};

impl Reconciler {
    /// Unseal Vault using the shares record
    ///
    /// A rejected share does not stop the remaining shares from being tried.
    /// Running out of shares while still sealed, or a missing shares record,
    /// is reported through the outcome rather than as an error.
    ///
    /// # Errors
    /// Returns an error when a gateway call fails for a reason other than a
    /// rejected share, or the shares record holds no shares.
    pub async fn unseal(&self) -> Result<UnsealOutcome, ReconcilerError> {
        let namespace = self.config.namespace.as_str();
        let keys_secret = self.config.keys_secret.as_str();

        let record = match self.store.get(keys_secret, namespace).await {
            Ok(record) => record,
            Err(SecretStoreError::NotFound { .. }) => {
                error!(
                    secret.name = keys_secret,
                    secret.namespace = namespace,
                    "Unseal keys secret not found, Vault stays sealed"
                );
                metrics::increment_unseal_failures("shares-missing");
                return Ok(UnsealOutcome::SharesMissing);
            }
            Err(e) => return Err(e.into()),
        };
        let shares = record_to_shares(&record)?;
        drop(record);

        let mut applied = 0;
        let mut rejected = 0;
        for share in &shares {
            match self.vault.unseal_one(share).await {
                Ok(still_sealed) => {
                    applied += 1;
                    metrics::increment_shares_applied();
                    if !still_sealed {
                        info!(applied, "Vault has been unsealed");
                        self.set_observed_state(ObservedState::Unsealed);
                        return Ok(UnsealOutcome::Unsealed { applied });
                    }
                    debug!(applied, "Unsealing Vault...");
                }
                Err(VaultError::InvalidShare(reason)) => {
                    rejected += 1;
                    metrics::increment_shares_rejected();
                    warn!(%reason, "Vault rejected an unseal share, trying the remaining shares");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            applied,
            rejected,
            available = shares.len(),
            "Unseal shares exhausted but Vault is still sealed; stored keys may be wrong or incomplete"
        );
        metrics::increment_unseal_failures("shares-exhausted");
        Ok(UnsealOutcome::Exhausted { applied, rejected })
    }
}
