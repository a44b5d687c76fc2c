use thiserror::Error;

/// # Summary
/// Messaging transport failure.
///
/// # Invariants
/// - Always recovered locally by the caller: logged, message dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Misconfiguration such as an unparsable address
    #[error("Configuration error: {0}")]
    Config(String),

    /// The messaging platform rejected the request
    #[error("Platform error: {0}")]
    Platform(String),
}
