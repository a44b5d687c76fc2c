//! In-memory port implementations for tests (feature `test-utils`).

use crate::common::Interval;
use crate::market::entity::PriceBar;
use crate::market::error::FetchError;
use crate::market::port::PriceSource;
use crate::notify::error::NotifyError;
use crate::notify::port::Notifier;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// One scripted answer of a `ScriptedSource`.
#[derive(Debug, Clone)]
pub enum Step {
    Bars(Vec<PriceBar>),
    Fail(FetchError),
    // Simulates an unanticipated fault inside the provider call
    Panic(String),
}

/// # Summary
/// Price source replaying a per-symbol script, then repeating a fallback step.
pub struct ScriptedSource {
    scripts: DashMap<String, VecDeque<Step>>,
    fallbacks: DashMap<String, Step>,
    calls: DashMap<String, usize>,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            scripts: DashMap::new(),
            fallbacks: DashMap::new(),
            calls: DashMap::new(),
        }
    }

    /// Queues `steps` for `symbol`, answered in order.
    pub fn script(&self, symbol: &str, steps: Vec<Step>) {
        self.scripts
            .entry(symbol.to_string())
            .or_default()
            .extend(steps);
    }

    /// Answer used once the script of `symbol` is exhausted. Defaults to `FetchError::Empty`.
    pub fn fallback(&self, symbol: &str, step: Step) {
        self.fallbacks.insert(symbol.to_string(), step);
    }

    pub fn calls(&self, symbol: &str) -> usize {
        self.calls.get(symbol).map(|c| *c).unwrap_or(0)
    }

    /// Polls until `symbol` was fetched at least `n` times.
    pub async fn wait_for_calls(&self, symbol: &str, n: usize) {
        while self.calls(symbol) < n {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    fn next_step(&self, symbol: &str) -> Step {
        *self.calls.entry(symbol.to_string()).or_insert(0) += 1;
        let scripted = self
            .scripts
            .get_mut(symbol)
            .and_then(|mut queue| queue.pop_front());
        scripted.unwrap_or_else(|| {
            self.fallbacks
                .get(symbol)
                .map(|s| s.value().clone())
                .unwrap_or(Step::Fail(FetchError::Empty))
        })
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    #[allow(clippy::panic)]
    async fn fetch(&self, symbol: &str, _: Interval) -> Result<Vec<PriceBar>, FetchError> {
        match self.next_step(symbol) {
            Step::Bars(bars) => Ok(bars),
            Step::Fail(err) => Err(err),
            Step::Panic(reason) => panic!("{}", reason),
        }
    }
}

/// # Summary
/// Notifier keeping every delivered `(destination, text)` pair.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every send is recorded as attempted but answers `NotifyError::Network`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Sent texts containing `needle`, in send order.
    pub fn texts_containing(&self, needle: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|(_, text)| text)
            .filter(|text| text.contains(needle))
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((destination.to_string(), text.to_string()));
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Network("recording notifier set to fail".into()));
        }
        Ok(())
    }
}

/// Builds a daily series from closing prices, starting 2024-01-01 UTC.
pub fn daily_series(closes: &[f64]) -> Vec<PriceBar> {
    let start: DateTime<Utc> = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    closes
        .iter()
        .zip(0_i64..)
        .map(|(&close, day)| PriceBar::flat(start + Duration::days(day), close))
        .collect()
}
