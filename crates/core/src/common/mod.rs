pub mod time;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// Sampling interval of a monitored price series.
///
/// # Invariants
/// - Closed set; every variant maps to exactly one lookback window (see `lookback`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    // 1 minute
    Minute1,
    // 5 minutes
    Minute5,
    // 15 minutes
    Minute15,
    // 30 minutes
    Minute30,
    // 1 hour
    Hour1,
    // 1 day
    Day1,
}

impl Interval {
    /// All supported intervals, shortest first.
    pub const ALL: [Interval; 6] = [
        Interval::Minute1,
        Interval::Minute5,
        Interval::Minute15,
        Interval::Minute30,
        Interval::Hour1,
        Interval::Day1,
    ];

    /// # Summary
    /// History span requested on every fetch for this interval.
    ///
    /// # Logic
    /// Fixed table sized so that each interval yields enough bars for a
    /// 50-period EMA plus margin. One month is counted as 30 days.
    ///
    /// # Returns
    /// The lookback window as a `chrono::Duration`.
    pub fn lookback(&self) -> Duration {
        match self {
            Interval::Minute1 => Duration::days(1),
            Interval::Minute5 => Duration::days(5),
            Interval::Minute15 => Duration::days(5),
            Interval::Minute30 => Duration::days(10),
            Interval::Hour1 => Duration::days(30),
            Interval::Day1 => Duration::days(100),
        }
    }

    /// Interval code understood by the Yahoo chart endpoint.
    pub fn provider_code(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "60m",
            Interval::Day1 => "1d",
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "minute1" => Ok(Interval::Minute1),
            "5m" | "minute5" => Ok(Interval::Minute5),
            "15m" | "minute15" => Ok(Interval::Minute15),
            "30m" | "minute30" => Ok(Interval::Minute30),
            "1h" | "60m" | "hour1" => Ok(Interval::Hour1),
            "1d" | "day1" => Ok(Interval::Day1),
            _ => Err(format!("Unknown Interval: {}", s)),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::Minute1 => write!(f, "1m"),
            Interval::Minute5 => write!(f, "5m"),
            Interval::Minute15 => write!(f, "15m"),
            Interval::Minute30 => write!(f, "30m"),
            Interval::Hour1 => write!(f, "1h"),
            Interval::Day1 => write!(f, "1d"),
        }
    }
}

/// # Summary
/// One monitored instrument, fixed for the lifetime of the process.
///
/// # Invariants
/// - `symbol` is the provider ticker (e.g. `EURUSD=X`, `GC=F`).
/// - The lookback window is never stored; it is always derived from `interval`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    // Display label used in logs, e.g. "EUR/USD"
    #[serde(default)]
    pub name: Option<String>,
    // Provider ticker
    pub symbol: String,
    // Sampling interval
    pub interval: Interval,
}

impl InstrumentConfig {
    pub fn new(symbol: impl Into<String>, interval: Interval) -> Self {
        Self {
            name: None,
            symbol: symbol.into(),
            interval,
        }
    }

    /// Attaches a display label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display label, falling back to the ticker.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }

    pub fn lookback(&self) -> Duration {
        self.interval.lookback()
    }
}
