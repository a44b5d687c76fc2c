use crate::notify::error::NotifyError;
use async_trait::async_trait;

/// # Summary
/// Outbound messaging contract.
///
/// # Invariants
/// - Implementations must be `Send` and `Sync`; one instance is shared by all workers.
/// - A failed delivery is reported once and never retried by the implementation.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Summary
    /// Delivers `text` to `destination`.
    ///
    /// # Arguments
    /// * `destination` - channel-specific target (Telegram chat id, e-mail address).
    /// * `text` - plain-text body.
    ///
    /// # Returns
    /// * `Ok(())` once the transport accepted the message.
    /// * `Err(NotifyError)` otherwise.
    async fn notify(&self, destination: &str, text: &str) -> Result<(), NotifyError>;
}
