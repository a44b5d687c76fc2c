//! Pure indicator math: EMA, Wilder RSI and the overbought/oversold predicate.
//!
//! Everything here is synchronous and side-effect free; the same series always
//! yields the same snapshot, bit for bit.

pub mod ema;
pub mod engine;
pub mod rsi;

pub use engine::{classify, evaluate};
