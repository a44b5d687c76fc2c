#![allow(dead_code)]

use vigil_core::market::entity::PriceBar;
use vigil_core::testing::daily_series;

/// Falling market with a short rebound still below EMA50: RSI(5) ≈ 78.7.
pub fn overbought() -> Vec<PriceBar> {
    daily_series(&overbought_closes())
}

/// Mirror of `overbought`: RSI(5) ≈ 21.3.
pub fn oversold() -> Vec<PriceBar> {
    let closes: Vec<f64> = overbought_closes().into_iter().map(|c| 170.0 - c).collect();
    daily_series(&closes)
}

/// Steady rise, no signal.
pub fn neutral() -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..60u32).map(|i| 100.0 + f64::from(i) * 0.5).collect();
    daily_series(&closes)
}

fn overbought_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..55u32)
        .map(|i| 100.0 - 30.0 * f64::from(i) / 54.0)
        .collect();
    closes.extend([71.0, 72.0, 73.0, 74.0, 75.0]);
    closes
}
