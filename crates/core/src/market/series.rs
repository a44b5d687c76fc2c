use crate::market::entity::PriceBar;
use crate::market::error::FetchError;

/// # Summary
/// Brings a raw provider series into canonical order.
///
/// # Logic
/// 1. Stable-sort by timestamp, so equal timestamps keep provider order.
/// 2. Drop every bar whose timestamp was already seen (first one wins).
/// 3. Reject an empty result.
///
/// # Arguments
/// * `bars`: provider output in any order.
///
/// # Returns
/// Ascending, duplicate-free series, or `FetchError::Empty`.
pub fn normalize_series(mut bars: Vec<PriceBar>) -> Result<Vec<PriceBar>, FetchError> {
    bars.sort_by_key(|bar| bar.time);
    bars.dedup_by(|later, earlier| later.time == earlier.time);

    if bars.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(bars)
}
