use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use vigil_core::notify::error::NotifyError;
use vigil_core::notify::port::Notifier;

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// # Summary
/// A notifier implementation that sends messages via the Telegram Bot API.
///
/// # Invariants
/// * `bot_token` must be valid.
/// * Destinations are chat ids the bot is allowed to post to.
pub struct TelegramNotifier {
    /// The Bot API token.
    bot_token: String,
    /// API root, overridable for tests.
    api_url: String,
    /// The HTTP client used for requests.
    client: reqwest::Client,
}

/// # Summary
/// Payload structure for Telegram `sendMessage` API.
#[derive(Serialize)]
struct TelegramMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl TelegramNotifier {
    /// # Summary
    /// Creates a new `TelegramNotifier`.
    ///
    /// # Logic
    /// Installs the TLS crypto provider and builds an HTTP client with a 10 second timeout.
    ///
    /// # Arguments
    /// * `bot_token` - The Telegram Bot API token.
    ///
    /// # Returns
    /// * A new instance of `TelegramNotifier`, or `NotifyError::Config` if the client cannot be built.
    pub fn new(bot_token: String) -> Result<Self, NotifyError> {
        vigil_core::install_crypto_provider();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            bot_token,
            api_url: DEFAULT_API_URL.to_string(),
            client,
        })
    }

    /// Points the notifier at another API root.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    /// # Summary
    /// Sends `text` to the chat `destination`.
    ///
    /// # Logic
    /// 1. POST `{chat_id, text}` to `/bot{token}/sendMessage`.
    /// 2. The text goes out without a parse mode, so tickers such as
    ///    `EURUSD=X` or `GC=F` are never read as markup.
    /// 3. A non-success status becomes `NotifyError::Platform` with the API's reply.
    ///
    /// # Returns
    /// * `Ok(())` if the message was accepted.
    /// * `Err(NotifyError)` if a network error occurs or the API returns a non-success status.
    async fn notify(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);
        let payload = TelegramMessage {
            chat_id: destination,
            text,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            // the request url embeds the bot token
            .map_err(|e| NotifyError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotifyError::Platform(format!(
                "Telegram API error ({}): {}",
                status, error_text
            )));
        }

        debug!(destination, "telegram message delivered");
        Ok(())
    }
}
