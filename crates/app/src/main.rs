mod logging;
mod settings;

use std::sync::Arc;

use tracing::{error, info, warn};
use vigil_core::config::{AppConfig, ConfigError, NotifyChannel};
use vigil_core::market::port::PriceSource;
use vigil_core::monitor::entity::WorkerExit;
use vigil_core::notify::port::Notifier;
use vigil_feed::YahooProvider;
use vigil_monitor::Supervisor;
use vigil_notify::{EmailNotifier, TelegramNotifier};

/// # Summary
/// Process entry point and dependency wiring.
///
/// # Logic
/// 1. Load `.env`, then the configuration.
/// 2. Initialize logging.
/// 3. Build the price source and the selected notifier.
/// 4. Run the supervisor until Ctrl-C, then wait for every worker to stop.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = settings::load()?;
    let _log_guard = logging::init(&config.logging);
    info!(
        instruments = config.instruments.len(),
        channel = ?config.notify.channel,
        "vigil starting..."
    );

    let source: Arc<dyn PriceSource> = Arc::new(YahooProvider::new()?);
    let notifier = build_notifier(&config)?;
    let supervisor = Supervisor::new(source, notifier, config.destination(), &config.monitor);

    let reports = supervisor
        .run_until(config.instruments.clone(), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "cannot listen for Ctrl-C, shutting down");
            }
        })
        .await;

    for report in &reports {
        match &report.exit {
            WorkerExit::Stopped => info!(name = %report.name, "stopped"),
            WorkerExit::Crashed(reason) => warn!(name = %report.name, reason = %reason, "crashed"),
        }
    }
    info!("All monitors stopped. Exiting...");
    Ok(())
}

fn build_notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>, Box<dyn std::error::Error>> {
    match config.notify.channel {
        NotifyChannel::Telegram => Ok(Arc::new(TelegramNotifier::new(
            config.telegram.bot_token.clone(),
        )?)),
        NotifyChannel::Email => {
            let email = config
                .email
                .as_ref()
                .ok_or_else(|| ConfigError::Invalid("email section is required".into()))?;
            Ok(Arc::new(EmailNotifier::new(
                &email.host,
                &email.user,
                &email.password,
                &email.from,
            )?))
        }
    }
}
