use crate::ema::ema;
use crate::rsi::rsi;
use tracing::trace;
use vigil_core::market::entity::PriceBar;
use vigil_core::signal::entity::{IndicatorSnapshot, Signal};

/// Fast trend window.
pub const EMA_FAST: u32 = 35;
/// Slow trend window.
pub const EMA_SLOW: u32 = 50;
/// Oscillator window.
pub const RSI_WINDOW: u32 = 5;
/// Oscillator level above which a bar may be overbought.
pub const OVERBOUGHT_LEVEL: f64 = 70.0;
/// Oscillator level below which a bar may be oversold.
pub const OVERSOLD_LEVEL: f64 = 30.0;
/// Bars needed before a signal may fire: the widest window plus one.
pub const MIN_BARS: usize = 51;

/// # Summary
/// Computes the indicator snapshot of the last bar of `series`.
///
/// # Logic
/// 1. Extract closes and run EMA(35), EMA(50) and Wilder RSI(5) over the whole series.
/// 2. Keep only the values at the last bar.
/// 3. Classify with `classify`; shorter than `MIN_BARS` or any undefined value gives `Signal::None`.
///
/// # Arguments
/// * `series`: ascending price bars.
///
/// # Returns
/// `None` only for an empty series.
pub fn evaluate(series: &[PriceBar]) -> Option<IndicatorSnapshot> {
    let last = series.last()?;
    let closes: Vec<f64> = series.iter().map(|bar| bar.close).collect();

    let ema35 = ema(&closes, EMA_FAST).last().copied().flatten();
    let ema50 = ema(&closes, EMA_SLOW).last().copied().flatten();
    let rsi5 = rsi(&closes, RSI_WINDOW).last().copied().flatten();

    let signal = match (ema35, ema50, rsi5) {
        (Some(fast), Some(slow), Some(osc)) if series.len() >= MIN_BARS => {
            classify(last.close, fast, slow, osc)
        }
        _ => Signal::None,
    };

    trace!(
        bars = series.len(),
        ?ema35,
        ?ema50,
        ?rsi5,
        ?signal,
        "indicators evaluated"
    );

    Some(IndicatorSnapshot {
        time: last.time,
        close: last.close,
        ema35,
        ema50,
        rsi5,
        signal,
    })
}

/// # Summary
/// Signal predicate on the last bar's values.
///
/// # Logic
/// - Overbought: `rsi > 70 && close < ema50 && ema50 > ema35`.
/// - Oversold: `rsi < 30 && close > ema50 && ema50 < ema35`.
///
/// The two branches cannot both hold since `rsi` cannot exceed 70 and be below 30.
/// NaN inputs fail every comparison and yield `Signal::None`.
pub fn classify(close: f64, ema35: f64, ema50: f64, rsi5: f64) -> Signal {
    if rsi5 > OVERBOUGHT_LEVEL && close < ema50 && ema50 > ema35 {
        Signal::Overbought
    } else if rsi5 < OVERSOLD_LEVEL && close > ema50 && ema50 < ema35 {
        Signal::Oversold
    } else {
        Signal::None
    }
}
