use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// One bar of an OHLC price series.
///
/// # Invariants
/// - Within a series, `time` is strictly increasing once normalized.
/// - Only `close` feeds the indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    // Bar open time
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// Bar whose four prices all equal `close`. Handy for synthetic series.
    pub fn flat(time: DateTime<Utc>, close: f64) -> Self {
        Self {
            time,
            open: close,
            high: close,
            low: close,
            close,
        }
    }
}
