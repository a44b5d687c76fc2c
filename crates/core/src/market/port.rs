use crate::common::Interval;
use crate::market::entity::PriceBar;
use crate::market::error::FetchError;
use async_trait::async_trait;

/// # Summary
/// Historical price provider contract.
///
/// # Invariants
/// - Implementations hold no mutable cross-call state and can be shared by
///   every worker behind an `Arc`.
/// - A successful result is non-empty, ascending by time, with unique timestamps.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// # Summary
    /// Fetches the recent price series of `symbol`.
    ///
    /// # Logic
    /// 1. Derive the lookback window from `interval`.
    /// 2. Query the provider for bars sampled at `interval` over that window.
    /// 3. Normalize the series (see `normalize_series`).
    ///
    /// # Arguments
    /// * `symbol`: provider ticker.
    /// * `interval`: sampling interval.
    ///
    /// # Returns
    /// The normalized series, or a `FetchError`.
    async fn fetch(&self, symbol: &str, interval: Interval) -> Result<Vec<PriceBar>, FetchError>;
}
