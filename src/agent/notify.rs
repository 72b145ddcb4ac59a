use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{error, info};
use serde_derive::{Deserialize, Serialize};

use crate::config::{Config, SmtpSettings};
use crate::errors::{Error, Result};

pub const CONFIRMATION_SUBJECT: &str = "Appointment Confirmation";

/// Submission relay used for confirmations (STARTTLS on port 587).
pub const SMTP_RELAY: &str = "smtp.gmail.com";

/// A booking confirmation mail, ready to hand to a transport.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Confirmation {
    pub fn compose(to: &str, name: &str, time: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            body: format!(
                "Hello {},\n\nYour appointment is confirmed for: {}.\n\nThank you!",
                name, time
            ),
        }
    }

    /// Build the plain-text message sent from `from`.
    pub fn to_message(&self, from: &Mailbox) -> Result<Message> {
        let message = Message::builder()
            .from(from.clone())
            .to(self.to.parse::<Mailbox>()?)
            .subject(&self.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())?;
        Ok(message)
    }
}

/// Delivers booking confirmations.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, confirmation: &Confirmation) -> Result<()>;
}

/// Sends confirmations through an authenticated SMTP relay.
pub struct SmtpNotifier {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// Prepare the transport; no connection is made until the first send.
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let from = settings.email.parse::<Mailbox>()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(SMTP_RELAY)?
            .credentials(Credentials::new(
                settings.email.clone(),
                settings.password.clone(),
            ))
            .build();
        Ok(Self { from, transport })
    }

    pub fn from(&self) -> &Mailbox {
        &self.from
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, confirmation: &Confirmation) -> Result<()> {
        let message = confirmation.to_message(&self.from)?;
        self.transport.send(message).await?;
        info!("confirmation sent to {}", confirmation.to);
        Ok(())
    }
}

/// Used when no sender account is configured; every send fails.
struct Unconfigured;

#[async_trait]
impl Notifier for Unconfigured {
    async fn send(&self, _confirmation: &Confirmation) -> Result<()> {
        error!("SMTP Credentials missing.");
        Err(Error::Internal("SMTP credentials missing".to_string()))
    }
}

pub fn notifier_from_config(config: &Config) -> Result<Arc<dyn Notifier>> {
    match &config.smtp {
        Some(sender) => Ok(Arc::new(SmtpNotifier::new(sender)?)),
        None => Ok(Arc::new(Unconfigured)),
    }
}
