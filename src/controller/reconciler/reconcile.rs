//! # Reconcile
//!
//! A single poll tick: observe, then initialize or unseal as needed.

use super::types::{ObservedState, Reconciler, ReconcilerError, TickOutcome};
use tracing::{debug, info};

impl Reconciler {
    /// Run one reconciliation tick
    ///
    /// An uninitialized Vault is only initialized in this tick; unsealing
    /// waits for the next one.
    ///
    /// # Errors
    /// Returns the first failure of the tick. Every error is transient from
    /// the loop's point of view and the next tick starts from scratch.
    pub async fn tick(&self) -> Result<TickOutcome, ReconcilerError> {
        debug!("Checking Vault seal status...");
        let status = match self.vault.get_seal_status().await {
            Ok(status) => status,
            Err(e) => {
                self.set_observed_state(ObservedState::Unknown);
                return Err(e.into());
            }
        };
        let observed = ObservedState::from(status);
        self.set_observed_state(observed);

        match observed {
            ObservedState::NotInitialized => Ok(TickOutcome::Initialize(self.initialize().await?)),
            ObservedState::Sealed => {
                info!("Vault is sealed, unsealing...");
                Ok(TickOutcome::Unseal(self.unseal().await?))
            }
            ObservedState::Unsealed | ObservedState::Unknown => {
                debug!("Vault is initialized and unsealed");
                Ok(TickOutcome::Idle)
            }
        }
    }
}
