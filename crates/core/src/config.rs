use crate::common::{InstrumentConfig, Interval};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// # Summary
/// Startup configuration failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    // Sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(String),
    // Values were read but are unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Global application configuration, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub notify: NotifyConfig,
    pub telegram: TelegramConfig,
    pub email: Option<EmailConfig>,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
    pub instruments: Vec<InstrumentConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyChannel {
    #[default]
    Telegram,
    Email,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub channel: NotifyChannel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // Sleep between two cycles of the same worker
    pub poll_interval_secs: u64,
    // Delay between two worker launches
    pub startup_stagger_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    // Directory for the rolling log file; console only when absent
    pub dir: Option<String>,
    pub file_prefix: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            startup_stagger_secs: 2,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn startup_stagger(&self) -> Duration {
        Duration::from_secs(self.startup_stagger_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_prefix: "vigil.log".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notify: NotifyConfig::default(),
            telegram: TelegramConfig::default(),
            email: None,
            monitor: MonitorConfig::default(),
            logging: LoggingConfig::default(),
            instruments: default_instruments(),
        }
    }
}

/// The stock watch list: major FX pairs plus gold futures, hourly.
pub fn default_instruments() -> Vec<InstrumentConfig> {
    [
        ("EUR/USD", "EURUSD=X"),
        ("EUR/NZD", "EURNZD=X"),
        ("EUR/JPY", "EURJPY=X"),
        ("GBP/USD", "GBPUSD=X"),
        ("USD/JPY", "USDJPY=X"),
        ("GBP/JPY", "GBPJPY=X"),
        ("XAU/USD", "GC=F"),
    ]
    .into_iter()
    .map(|(name, symbol)| InstrumentConfig::new(symbol, Interval::Hour1).with_name(name))
    .collect()
}

impl AppConfig {
    /// # Summary
    /// Rejects configurations the monitor cannot run with.
    ///
    /// # Logic
    /// 1. At least one instrument, none with a blank symbol.
    /// 2. Non-zero poll interval.
    /// 3. Credentials present for the selected channel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::Invalid("no instruments configured".into()));
        }
        if let Some(blank) = self.instruments.iter().find(|i| i.symbol.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "instrument {:?} has an empty symbol",
                blank.name
            )));
        }
        if self.monitor.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "monitor.poll_interval_secs must be positive".into(),
            ));
        }

        match self.notify.channel {
            NotifyChannel::Telegram => {
                if self.telegram.bot_token.trim().is_empty() {
                    return Err(ConfigError::Invalid("telegram.bot_token is required".into()));
                }
                if self.telegram.chat_id.trim().is_empty() {
                    return Err(ConfigError::Invalid("telegram.chat_id is required".into()));
                }
            }
            NotifyChannel::Email => {
                let email = self
                    .email
                    .as_ref()
                    .ok_or_else(|| ConfigError::Invalid("email section is required".into()))?;
                if email.host.trim().is_empty() || email.to.trim().is_empty() {
                    return Err(ConfigError::Invalid("email.host and email.to are required".into()));
                }
            }
        }
        Ok(())
    }

    /// Destination identifier handed to the notifier on every send.
    pub fn destination(&self) -> &str {
        match (self.notify.channel, &self.email) {
            (NotifyChannel::Email, Some(email)) => &email.to,
            _ => &self.telegram.chat_id,
        }
    }
}
