use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// Classification of the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    None,
    Overbought,
    Oversold,
}

/// # Summary
/// Indicator values at the last bar of a series, recomputed every cycle.
///
/// # Invariants
/// - A `None` indicator means the series is too short for its window.
/// - `signal` is `Signal::None` whenever any indicator is `None`.
/// - `rsi5`, when present, lies in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    // Time of the last bar
    pub time: DateTime<Utc>,
    // Close of the last bar
    pub close: f64,
    pub ema35: Option<f64>,
    pub ema50: Option<f64>,
    pub rsi5: Option<f64>,
    pub signal: Signal,
}
