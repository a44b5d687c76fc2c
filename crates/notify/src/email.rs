use async_trait::async_trait;
use lettre::message::{Message, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use vigil_core::notify::error::NotifyError;
use vigil_core::notify::port::Notifier;

/// # Summary
/// A notifier implementation that sends alerts by e-mail over an SMTP relay.
///
/// # Invariants
/// - Requires valid SMTP credentials and server configuration.
/// - The `AsyncSmtpTransport` is reused for every notification.
/// - The destination passed to `notify` is the recipient address.
pub struct EmailNotifier {
    /// The asynchronous SMTP transport.
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    /// The sender's email address.
    from: String,
}

impl EmailNotifier {
    /// # Summary
    /// Creates a new `EmailNotifier`.
    ///
    /// # Logic
    /// 1. Sets up the SMTP credentials.
    /// 2. Configures the relay transport with TLS and authentication.
    ///
    /// # Arguments
    /// * `host` - The SMTP server host (e.g., "smtp.gmail.com").
    /// * `user` - The SMTP username.
    /// * `pass` - The SMTP password or app-specific password.
    /// * `from` - The sender's email address.
    ///
    /// # Returns
    /// * A new instance of `EmailNotifier` or `NotifyError::Config`.
    pub fn new(host: &str, user: &str, pass: &str, from: &str) -> Result<Self, NotifyError> {
        let creds = Credentials::new(user.to_string(), pass.to_string());

        // Submission port 587 with STARTTLS
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| NotifyError::Config(format!("Invalid SMTP host: {}", e)))?
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from: from.to_string(),
        })
    }
}

/// First line of an alert, used as the mail subject.
pub(crate) fn subject_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("vigil alert")
}

#[async_trait]
impl Notifier for EmailNotifier {
    /// # Summary
    /// Mails `text` to `destination`.
    ///
    /// # Logic
    /// 1. Subject is the first non-blank line of the text; body is the full text.
    /// 2. Content-Type is plain text.
    /// 3. Sent through the shared SMTP transport.
    async fn notify(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| NotifyError::Config(format!("Invalid from address: {}", e)))?,
            )
            .to(destination
                .parse()
                .map_err(|e| NotifyError::Config(format!("Invalid to address: {}", e)))?)
            .subject(subject_line(text))
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string())
            .map_err(|e| NotifyError::Platform(format!("Failed to build email: {}", e)))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::Network(format!("SMTP error: {}", e)))?;

        Ok(())
    }
}
