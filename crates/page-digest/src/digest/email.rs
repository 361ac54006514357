//! Digest delivery over SMTP.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::{DigestError, Result};

/// Delivers a finished digest to its recipients.
#[async_trait]
pub trait DigestMailer: Send + Sync {
    /// Send the same subject and body to every recipient, one message each,
    /// in order. Stops at the first failed delivery.
    ///
    /// Returns the number of messages delivered.
    async fn send_digest(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<usize>;
}

/// Sender for digests over any lettre transport; SMTP relay by default.
pub struct EmailSender<T = AsyncSmtpTransport<Tokio1Executor>> {
    sender: String,
    transport: T,
}

impl EmailSender {
    /// Create a sender connected to the configured relay over implicit TLS (SMTPS).
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let creds = Credentials::new(config.sender.clone(), config.password);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(DigestError::SmtpTransport)?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self::with_transport(config.sender, transport))
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(SmtpConfig::from_env()?)
    }
}

impl<T> EmailSender<T> {
    /// Create a sender that delivers through `transport`.
    pub fn with_transport(sender: impl Into<String>, transport: T) -> Self {
        Self {
            sender: sender.into(),
            transport,
        }
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the message for a single recipient.
    pub fn build_message(
        &self,
        to: Mailbox,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<Message> {
        let from = parse_mailbox(&self.sender)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        Ok(message)
    }
}

#[async_trait]
impl<T> DigestMailer for EmailSender<T>
where
    T: AsyncTransport + Send + Sync,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    async fn send_digest(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<usize> {
        // Reject bad addresses before anything goes out.
        let mailboxes = recipients
            .iter()
            .map(|address| parse_mailbox(address))
            .collect::<Result<Vec<_>>>()?;

        let mut delivered = 0;

        for (address, mailbox) in recipients.iter().zip(mailboxes) {
            let message = self.build_message(mailbox, subject, html_body, text_body)?;

            self.transport
                .send(message)
                .await
                .map_err(|source| DigestError::Email {
                    recipient: address.clone(),
                    delivered,
                    source: Box::new(source),
                })?;

            delivered += 1;
            tracing::info!(to = %address, subject, "Digest email sent");
        }

        Ok(delivered)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|source| DigestError::Address {
            address: address.to_string(),
            source,
        })
}
