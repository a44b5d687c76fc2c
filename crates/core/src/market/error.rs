use thiserror::Error;

/// # Summary
/// Failure to obtain a usable price series.
///
/// # Invariants
/// - Every variant is transient from the monitor's point of view: the cycle
///   is skipped and the next one retries naturally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    // Transport failure (DNS, TLS, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),
    // Provider answered with a non-success HTTP status
    #[error("HTTP status {0}")]
    Http(u16),
    // Body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
    // Provider reported an error in an otherwise valid payload
    #[error("Provider error: {0}")]
    Provider(String),
    // No usable bars after normalization
    #[error("Empty price series")]
    Empty,
}
