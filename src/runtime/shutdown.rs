//! Cooperative shutdown signal.
//!
//! Cloned handles share one `watch` channel. Triggering it wakes every
//! handle that is sleeping in `sleep_or_shutdown`.

use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: watch::Sender<bool>,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Sleep for `duration` unless shutdown is requested first
    ///
    /// Returns `true` if shutdown was requested before or during the sleep.
    pub async fn sleep_or_shutdown(&self, duration: Duration) -> bool {
        let mut receiver = self.sender.subscribe();
        if *receiver.borrow_and_update() {
            return true;
        }
        tokio::select! {
            () = tokio::time::sleep(duration) => self.is_triggered(),
            changed = receiver.wait_for(|triggered| *triggered) => changed.is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sleep_completes_without_trigger() {
        let signal = ShutdownSignal::new();
        assert!(!signal.sleep_or_shutdown(Duration::from_millis(5)).await);
        assert!(!signal.is_triggered());
    }

    #[tokio::test]
    async fn test_trigger_interrupts_sleep() {
        let signal = ShutdownSignal::new();
        let handle = signal.clone();
        let sleeper =
            tokio::spawn(async move { handle.sleep_or_shutdown(Duration::from_secs(3600)).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.trigger();

        let interrupted = tokio::time::timeout(Duration::from_secs(5), sleeper)
            .await
            .expect("sleeper should wake promptly")
            .expect("sleeper task panicked");
        assert!(interrupted);
    }

    #[tokio::test]
    async fn test_already_triggered_returns_immediately() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.trigger();
        assert!(signal.is_triggered());
        assert!(signal.sleep_or_shutdown(Duration::from_secs(3600)).await);
    }
}
