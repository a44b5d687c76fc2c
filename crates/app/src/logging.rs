use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vigil_core::config::LoggingConfig;

/// # Summary
/// Installs the global subscriber.
///
/// # Logic
/// 1. Filter from `RUST_LOG`, `info` when unset or malformed.
/// 2. Console layer always.
/// 3. Daily-rolling file layer when `config.dir` is set.
///
/// # Returns
/// The file writer guard; it must live as long as the process logs.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_target(true);

    match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .init();
            None
        }
    }
}
