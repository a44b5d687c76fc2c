use crate::alert;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use vigil_core::common::InstrumentConfig;
use vigil_core::market::error::FetchError;
use vigil_core::market::port::PriceSource;
use vigil_core::monitor::entity::{WorkerExit, WorkerReport, WorkerState};
use vigil_core::notify::entity::AlertMessage;
use vigil_core::notify::port::Notifier;
use vigil_core::signal::entity::IndicatorSnapshot;

/// # Summary
/// Monitoring loop of a single instrument.
///
/// # Invariants
/// - Owns no state that outlives a cycle: each cycle fetches, evaluates and
///   discards its own series.
/// - Cycles never overlap; the next one starts after the poll sleep.
/// - Fetch and delivery failures are logged and swallowed. Only a panic ends
///   the loop without a cancellation.
pub struct MonitorWorker {
    instrument: InstrumentConfig,
    source: Arc<dyn PriceSource>,
    notifier: Arc<dyn Notifier>,
    // Chat id or address handed to the notifier
    destination: Arc<str>,
    poll_interval: Duration,
}

impl MonitorWorker {
    pub fn new(
        instrument: InstrumentConfig,
        source: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
        destination: Arc<str>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            instrument,
            source,
            notifier,
            destination,
            poll_interval,
        }
    }

    pub fn instrument(&self) -> &InstrumentConfig {
        &self.instrument
    }

    /// # Summary
    /// Runs the worker until cancellation or an unanticipated fault.
    ///
    /// # Logic
    /// 1. Starting: best-effort StartupNotice, then Running.
    /// 2. Running: `run_cycle`, sleep `poll_interval`, repeat. Cancellation is
    ///    checked before each cycle and interrupts the sleep.
    /// 3. Stopping (cancelled): best-effort StoppedNotice.
    /// 4. Crashed (panic caught anywhere in 1-2): best-effort ErrorNotice.
    ///
    /// # Arguments
    /// * `shutdown`: process-wide cancellation flag; a dropped sender also cancels.
    ///
    /// # Returns
    /// How the worker ended.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> WorkerReport {
        let name = self.instrument.display_name().to_string();
        self.transition(WorkerState::Starting);

        let outcome = AssertUnwindSafe(self.lifecycle(&mut shutdown))
            .catch_unwind()
            .await;

        let exit = match outcome {
            Ok(()) => {
                self.transition(WorkerState::Stopping);
                self.deliver(alert::stopped(&self.instrument)).await;
                WorkerExit::Stopped
            }
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                self.transition(WorkerState::Crashed);
                error!(name = %name, reason = %reason, "monitor crashed");
                let notice = alert::error(&self.instrument, &reason);
                if AssertUnwindSafe(self.deliver(notice))
                    .catch_unwind()
                    .await
                    .is_err()
                {
                    error!(name = %name, "error notice could not be sent");
                }
                WorkerExit::Crashed(reason)
            }
        };

        info!(name = %name, "Monitoring of {} finished", self.instrument.symbol);
        WorkerReport {
            name,
            symbol: self.instrument.symbol.clone(),
            interval: self.instrument.interval,
            exit,
        }
    }

    async fn lifecycle(&self, shutdown: &mut watch::Receiver<bool>) {
        info!(
            "Starting monitoring of {} on {}",
            self.instrument.symbol, self.instrument.interval
        );
        self.deliver(alert::startup(&self.instrument)).await;
        self.transition(WorkerState::Running);

        loop {
            if *shutdown.borrow() {
                return;
            }

            if let Err(e) = self.run_cycle().await {
                warn!(
                    symbol = %self.instrument.symbol,
                    interval = %self.instrument.interval,
                    error = %e,
                    "fetch failed, cycle skipped"
                );
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = cancelled(shutdown) => return,
            }
        }
    }

    /// # Summary
    /// One fetch/evaluate/alert pass.
    ///
    /// # Logic
    /// 1. Fetch the series; a `FetchError` is returned to the caller untouched.
    /// 2. Evaluate indicators on the last bar.
    /// 3. On Overbought or Oversold, send the alert. Every cycle the condition
    ///    holds sends again; a failed send is logged and dropped.
    ///
    /// # Returns
    /// The snapshot of this cycle.
    pub async fn run_cycle(&self) -> Result<IndicatorSnapshot, FetchError> {
        let series = self
            .source
            .fetch(&self.instrument.symbol, self.instrument.interval)
            .await?;
        let snapshot = vigil_indicator::evaluate(&series).ok_or(FetchError::Empty)?;

        debug!(
            symbol = %self.instrument.symbol,
            bars = series.len(),
            close = snapshot.close,
            ema35 = ?snapshot.ema35,
            ema50 = ?snapshot.ema50,
            rsi5 = ?snapshot.rsi5,
            signal = ?snapshot.signal,
            "cycle evaluated"
        );

        if let Some(message) = alert::signal_alert(&self.instrument, &snapshot) {
            info!(symbol = %self.instrument.symbol, kind = %message.kind, "signal detected");
            self.deliver(message).await;
        }
        Ok(snapshot)
    }

    /// Best-effort send; failures are only logged.
    async fn deliver(&self, message: AlertMessage) {
        if let Err(e) = self.notifier.notify(&self.destination, &message.payload).await {
            warn!(
                symbol = %self.instrument.symbol,
                kind = %message.kind,
                error = %e,
                "notification dropped"
            );
        }
    }

    fn transition(&self, state: WorkerState) {
        info!(
            symbol = %self.instrument.symbol,
            interval = %self.instrument.interval,
            state = %state,
            "worker state"
        );
    }
}

/// Resolves once cancellation is requested or the sender is gone.
pub(crate) async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    drop(shutdown.wait_for(|stop| *stop).await);
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown fault".to_string()
    }
}
