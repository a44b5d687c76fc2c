use crate::worker::{MonitorWorker, cancelled};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};
use vigil_core::common::InstrumentConfig;
use vigil_core::config::MonitorConfig;
use vigil_core::market::port::PriceSource;
use vigil_core::monitor::entity::{WorkerExit, WorkerReport};
use vigil_core::notify::port::Notifier;

/// # Summary
/// Launches one `MonitorWorker` per instrument and collects their reports.
///
/// # Invariants
/// - Adapters are shared read-only between workers.
/// - Workers share nothing else; one crashing worker leaves the others running.
pub struct Supervisor {
    source: Arc<dyn PriceSource>,
    notifier: Arc<dyn Notifier>,
    destination: Arc<str>,
    poll_interval: Duration,
    // Delay between two worker launches, to spread the first requests
    startup_stagger: Duration,
}

/// # Summary
/// Control of a started supervisor.
///
/// # Invariants
/// - `wait` returns only after every spawned worker has exited.
pub struct SupervisorHandle {
    shutdown_tx: watch::Sender<bool>,
    launcher: JoinHandle<()>,
    // Spawned workers in launch order; the launcher holds the sending side
    spawned: mpsc::UnboundedReceiver<Spawned>,
}

type Spawned = (InstrumentConfig, JoinHandle<WorkerReport>);

impl Supervisor {
    /// # Summary
    /// Creates a supervisor wired to the given adapters.
    ///
    /// # Arguments
    /// * `source`: price source shared by all workers.
    /// * `notifier`: alert channel shared by all workers.
    /// * `destination`: chat id or address every alert goes to.
    /// * `config`: poll interval and startup stagger.
    pub fn new(
        source: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
        destination: impl Into<Arc<str>>,
        config: &MonitorConfig,
    ) -> Self {
        Self {
            source,
            notifier,
            destination: destination.into(),
            poll_interval: config.poll_interval(),
            startup_stagger: config.startup_stagger(),
        }
    }

    /// # Summary
    /// Starts monitoring every instrument in `configs`.
    ///
    /// # Logic
    /// 1. Create the shared cancellation flag.
    /// 2. Spawn a launcher task which spawns the workers one by one, sleeping
    ///    `startup_stagger` between two launches. A shutdown during the stagger
    ///    leaves the remaining instruments unstarted.
    /// 3. Every spawned worker handle is passed back to the `SupervisorHandle`,
    ///    which joins them in `wait`.
    ///
    /// # Returns
    /// A handle to cancel and await the workers.
    pub fn start(&self, configs: Vec<InstrumentConfig>) -> SupervisorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let workers: Vec<MonitorWorker> = configs
            .into_iter()
            .map(|instrument| {
                MonitorWorker::new(
                    instrument,
                    self.source.clone(),
                    self.notifier.clone(),
                    self.destination.clone(),
                    self.poll_interval,
                )
            })
            .collect();

        let (spawned_tx, spawned) = mpsc::unbounded_channel();

        info!(count = workers.len(), "Launching monitors");
        let launcher = tokio::spawn(launch(
            workers,
            shutdown_rx,
            self.startup_stagger,
            spawned_tx,
        ));

        SupervisorHandle {
            shutdown_tx,
            launcher,
            spawned,
        }
    }

    /// Starts every instrument and waits for all workers to exit.
    pub async fn run(&self, configs: Vec<InstrumentConfig>) -> Vec<WorkerReport> {
        self.start(configs).wait().await
    }

    /// # Summary
    /// Runs until `signal` resolves, then shuts down and waits for the workers.
    ///
    /// # Arguments
    /// * `configs`: instruments to monitor.
    /// * `signal`: host-side stop trigger, e.g. Ctrl-C.
    pub async fn run_until<F>(&self, configs: Vec<InstrumentConfig>, signal: F) -> Vec<WorkerReport>
    where
        F: Future<Output = ()>,
    {
        let handle = self.start(configs);
        signal.await;
        info!("Shutdown requested");
        handle.shutdown();
        handle.wait().await
    }
}

impl SupervisorHandle {
    /// Broadcasts cancellation to every worker, launched or not yet launched.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// # Summary
    /// Waits until the launcher and every worker have exited.
    ///
    /// # Logic
    /// 1. Await the launcher. If it failed, cancel the workers it already spawned.
    /// 2. Join every spawned worker; a failed task is reported as crashed.
    ///
    /// # Returns
    /// One report per launched worker, in launch order.
    pub async fn wait(self) -> Vec<WorkerReport> {
        let Self {
            shutdown_tx,
            launcher,
            mut spawned,
        } = self;

        if let Err(e) = launcher.await {
            error!(error = %e, "monitor launcher failed, stopping launched monitors");
            shutdown_tx.send_replace(true);
        }

        let mut reports = Vec::new();
        while let Some((instrument, handle)) = spawned.recv().await {
            reports.push(join_worker(instrument, handle).await);
        }
        drop(shutdown_tx);
        reports
    }
}

async fn join_worker(instrument: InstrumentConfig, handle: JoinHandle<WorkerReport>) -> WorkerReport {
    match handle.await {
        Ok(report) => report,
        Err(e) => {
            error!(symbol = %instrument.symbol, error = %e, "monitor task failed");
            WorkerReport {
                name: instrument.display_name().to_string(),
                symbol: instrument.symbol.clone(),
                interval: instrument.interval,
                exit: WorkerExit::Crashed(e.to_string()),
            }
        }
    }
}

async fn launch(
    workers: Vec<MonitorWorker>,
    mut shutdown: watch::Receiver<bool>,
    stagger: Duration,
    spawned: mpsc::UnboundedSender<Spawned>,
) {
    for (index, worker) in workers.into_iter().enumerate() {
        if index > 0 {
            tokio::select! {
                _ = tokio::time::sleep(stagger) => {}
                _ = cancelled(&mut shutdown) => break,
            }
        }
        if *shutdown.borrow() {
            break;
        }

        let instrument = worker.instrument().clone();
        info!("Started monitoring of {}", instrument.display_name());
        let handle = tokio::spawn(worker.run(shutdown.clone()));
        if spawned.send((instrument, handle)).is_err() {
            // handle dropped; the worker stops on the closed shutdown channel
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::common::Interval;
    use vigil_core::testing::{RecordingNotifier, ScriptedSource};

    /// # Summary
    /// A failed launcher still leaves `wait` joining the workers it spawned.
    ///
    /// # Logic
    /// 1. A launcher spawns one worker, hands it over, then panics.
    /// 2. `wait` must cancel that worker and return its report after it exited.
    #[tokio::test(start_paused = true)]
    async fn test_wait_joins_workers_after_launcher_failure() {
        let source = Arc::new(ScriptedSource::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (spawned_tx, spawned) = mpsc::unbounded_channel::<Spawned>();

        let worker = MonitorWorker::new(
            InstrumentConfig::new("EURUSD=X", Interval::Hour1),
            source.clone(),
            notifier.clone(),
            Arc::from("chat-1"),
            Duration::from_secs(60),
        );
        let launcher = tokio::spawn(async move {
            let instrument = worker.instrument().clone();
            let handle = tokio::spawn(worker.run(shutdown_rx));
            spawned_tx.send((instrument, handle)).unwrap();
            panic!("launcher failed");
        });

        let handle = SupervisorHandle {
            shutdown_tx,
            launcher,
            spawned,
        };
        let reports = handle.wait().await;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].symbol, "EURUSD=X");
        assert_eq!(reports[0].exit, WorkerExit::Stopped);
        assert_eq!(
            notifier.texts_containing("🛑 Monitoring for EURUSD=X on 1h has stopped.").len(),
            1
        );
    }
}
