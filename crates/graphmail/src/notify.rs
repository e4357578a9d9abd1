//! Operator notification over SMTP
//!
//! One transport per notification: connect, STARTTLS, authenticate, send,
//! drop. No reuse, no retry, no delivery confirmation beyond the protocol
//! acceptance. Failures here are terminal — never wrapped in a further
//! reporting layer.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{Message, SmtpTransport, Transport};
use log::info;

use crate::config::SmtpSettings;
use crate::error::GraphError;

/// Sink for operator notifications. Trait seam so the reporting wrapper can
/// be exercised against a recording sink in tests.
pub trait Notifier {
    fn send(&self, subject: &str, body: &str) -> Result<(), GraphError>;
}

/// Sends one HTML mail per call through the configured SMTP relay.
pub struct SmtpNotifier {
    settings: SmtpSettings,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, subject: &str, body: &str) -> Result<(), GraphError> {
        let message = build_message(&self.settings, subject, body)?;

        let transport = SmtpTransport::starttls_relay(&self.settings.smtp_host)
            .map_err(notification_error)?
            .port(self.settings.smtp_port)
            .credentials(SmtpCredentials::new(
                self.settings.sender_username.clone(),
                self.settings.sender_password.clone(),
            ))
            .build();

        transport.send(&message).map_err(notification_error)?;
        info!("Mail sent to {}", self.settings.receiver_address.join(", "));
        Ok(())
    }
}

/// Build the notification mail addressed to every configured recipient.
fn build_message(
    settings: &SmtpSettings,
    subject: &str,
    body: &str,
) -> Result<Message, GraphError> {
    let mut builder = Message::builder()
        .from(settings.sender_username.parse().map_err(notification_error)?)
        .subject(subject)
        .header(ContentType::TEXT_HTML);

    for receiver in &settings.receiver_address {
        builder = builder.to(receiver.parse().map_err(notification_error)?);
    }

    builder.body(body.to_string()).map_err(notification_error)
}

fn notification_error(err: impl std::fmt::Display) -> GraphError {
    GraphError::Notification {
        message: err.to_string(),
    }
}
