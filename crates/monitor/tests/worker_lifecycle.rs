mod common;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use vigil_core::common::{InstrumentConfig, Interval};
use vigil_core::market::error::FetchError;
use vigil_core::monitor::entity::WorkerExit;
use vigil_core::signal::entity::Signal;
use vigil_core::testing::{RecordingNotifier, ScriptedSource, Step};
use vigil_monitor::MonitorWorker;

const POLL: Duration = Duration::from_secs(60);

fn worker(source: &Arc<ScriptedSource>, notifier: &Arc<RecordingNotifier>) -> MonitorWorker {
    MonitorWorker::new(
        InstrumentConfig::new("EURUSD=X", Interval::Hour1).with_name("EUR/USD"),
        source.clone(),
        notifier.clone(),
        Arc::from("chat-1"),
        POLL,
    )
}

/// # Summary
/// Overbought, neutral, then oversold cycles send exactly two alerts, in order,
/// framed by the startup and stopped notices.
#[tokio::test(start_paused = true)]
async fn test_alerts_follow_cycle_signals() {
    let source = Arc::new(ScriptedSource::new());
    let notifier = Arc::new(RecordingNotifier::new());
    source.script(
        "EURUSD=X",
        vec![
            Step::Bars(common::overbought()),
            Step::Bars(common::neutral()),
            Step::Bars(common::oversold()),
        ],
    );

    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(worker(&source, &notifier).run(rx));

    source.wait_for_calls("EURUSD=X", 3).await;
    tx.send_replace(true);
    let report = task.await.unwrap();

    assert_eq!(report.exit, WorkerExit::Stopped);
    assert_eq!(report.name, "EUR/USD");
    assert_eq!(report.symbol, "EURUSD=X");

    let sent = notifier.sent();
    assert_eq!(sent.len(), 4, "{:?}", sent);
    assert!(sent.iter().all(|(dest, _)| dest == "chat-1"));
    assert_eq!(sent[0].1, "🚀 Monitoring started for EURUSD=X on 1h.");
    assert!(sent[1].1.starts_with("🔴 OVERBOUGHT ALERT EURUSD=X\n"));
    assert!(sent[1].1.contains("RSI(5): 78.69"));
    assert!(sent[2].1.starts_with("🟢 OVERSOLD ALERT EURUSD=X\n"));
    assert_eq!(sent[3].1, "🛑 Monitoring for EURUSD=X on 1h has stopped.");
}

#[tokio::test(start_paused = true)]
async fn test_fetch_errors_do_not_stop_the_loop() {
    let source = Arc::new(ScriptedSource::new());
    let notifier = Arc::new(RecordingNotifier::new());
    source.script(
        "EURUSD=X",
        vec![
            Step::Fail(FetchError::Network("connection reset".into())),
            Step::Fail(FetchError::Http(503)),
        ],
    );
    source.fallback("EURUSD=X", Step::Bars(common::overbought()));

    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(worker(&source, &notifier).run(rx));

    source.wait_for_calls("EURUSD=X", 3).await;
    tx.send_replace(true);
    let report = task.await.unwrap();

    assert_eq!(report.exit, WorkerExit::Stopped);
    assert_eq!(notifier.texts_containing("OVERBOUGHT ALERT").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_delivery_failures_do_not_stop_the_loop() {
    let source = Arc::new(ScriptedSource::new());
    let notifier = Arc::new(RecordingNotifier::new());
    notifier.set_failing(true);
    source.fallback("EURUSD=X", Step::Bars(common::overbought()));

    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(worker(&source, &notifier).run(rx));

    source.wait_for_calls("EURUSD=X", 3).await;
    tx.send_replace(true);
    let report = task.await.unwrap();

    assert_eq!(report.exit, WorkerExit::Stopped);
    assert_eq!(notifier.texts_containing("OVERBOUGHT ALERT").len(), 3);
    assert_eq!(notifier.texts_containing("has stopped").len(), 1);
}

/// # Summary
/// A condition that persists is alerted on every cycle.
#[tokio::test(start_paused = true)]
async fn test_persisting_signal_is_sent_each_cycle() {
    let source = Arc::new(ScriptedSource::new());
    let notifier = Arc::new(RecordingNotifier::new());
    source.fallback("EURUSD=X", Step::Bars(common::oversold()));

    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(worker(&source, &notifier).run(rx));

    source.wait_for_calls("EURUSD=X", 2).await;
    tx.send_replace(true);
    task.await.unwrap();

    assert_eq!(notifier.texts_containing("OVERSOLD ALERT").len(), 2);
}

/// # Summary
/// Cancellation interrupts the poll sleep instead of waiting it out.
#[tokio::test(start_paused = true)]
async fn test_cancellation_interrupts_sleep() {
    let source = Arc::new(ScriptedSource::new());
    let notifier = Arc::new(RecordingNotifier::new());
    source.fallback("EURUSD=X", Step::Bars(common::neutral()));

    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(worker(&source, &notifier).run(rx));

    source.wait_for_calls("EURUSD=X", 1).await;
    let cancelled_at = Instant::now();
    tx.send_replace(true);
    let report = task.await.unwrap();

    assert!(cancelled_at.elapsed() < POLL);
    assert_eq!(report.exit, WorkerExit::Stopped);
    assert_eq!(source.calls("EURUSD=X"), 1);
    assert_eq!(notifier.texts_containing("has stopped").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_first_cycle_never_fetches() {
    let source = Arc::new(ScriptedSource::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let (tx, rx) = watch::channel(true);
    let report = worker(&source, &notifier).run(rx).await;
    drop(tx);

    assert_eq!(report.exit, WorkerExit::Stopped);
    assert_eq!(source.calls("EURUSD=X"), 0);
    let texts: Vec<String> = notifier.sent().into_iter().map(|(_, t)| t).collect();
    assert_eq!(
        texts,
        vec![
            "🚀 Monitoring started for EURUSD=X on 1h.".to_string(),
            "🛑 Monitoring for EURUSD=X on 1h has stopped.".to_string(),
        ]
    );
}

/// # Summary
/// A panic inside a cycle ends the worker as Crashed with an error notice and
/// no stopped notice.
#[tokio::test(start_paused = true)]
async fn test_panic_crashes_worker_with_error_notice() {
    let source = Arc::new(ScriptedSource::new());
    let notifier = Arc::new(RecordingNotifier::new());
    source.script(
        "EURUSD=X",
        vec![
            Step::Bars(common::neutral()),
            Step::Panic("provider exploded".into()),
        ],
    );

    let (_tx, rx) = watch::channel(false);
    let report = worker(&source, &notifier).run(rx).await;

    assert_eq!(report.exit, WorkerExit::Crashed("provider exploded".into()));
    assert_eq!(
        notifier.texts_containing("stopped due to an error: provider exploded").len(),
        1
    );
    assert!(notifier.texts_containing("has stopped").is_empty());
}

#[tokio::test]
async fn test_run_cycle_returns_snapshot() {
    let source = Arc::new(ScriptedSource::new());
    let notifier = Arc::new(RecordingNotifier::new());
    source.script("EURUSD=X", vec![Step::Bars(common::overbought())]);

    let snapshot = worker(&source, &notifier).run_cycle().await.unwrap();

    assert_eq!(snapshot.signal, Signal::Overbought);
    assert_eq!(snapshot.close, 75.0);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_run_cycle_passes_fetch_error_through() {
    let source = Arc::new(ScriptedSource::new());
    let notifier = Arc::new(RecordingNotifier::new());
    source.script(
        "EURUSD=X",
        vec![Step::Fail(FetchError::Provider("No data found".into()))],
    );

    let result = worker(&source, &notifier).run_cycle().await;

    assert_eq!(
        result.unwrap_err(),
        FetchError::Provider("No data found".into())
    );
    assert!(notifier.sent().is_empty());
}
