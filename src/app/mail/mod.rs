use std::sync::Arc;

use crate::app::{config::Config, domain::Email};

/// Message to be sent via any email implementation.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: Email,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: Email, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Invitation to join an organization, linking to the accept page.
    pub fn invitation(
        to: Email,
        organization_name: &str,
        inviter_email: &str,
        role: &str,
        link: &str,
    ) -> Self {
        Self::new(
            to,
            format!("You've been invited to join {}", organization_name),
            format!(
                "{} invited you to join {} as {}.\n\nAccept the invitation: {}\n",
                inviter_email, organization_name, role, link
            ),
        )
    }
}

/// Abstract interface for sending email. Swappable per environment.
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}

/// Errors that can occur during email sending.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("SMTP error: {0}")]
    Smtp(String),
    #[error("Send error: {0}")]
    Send(String),
}

pub use console::ConsoleMailer;
pub use smtp::SmtpMailer;

mod console;
mod smtp;

/// Build the email sender from config.
pub fn from_config(config: &Config) -> Result<Arc<dyn EmailSender>, EmailError> {
    match config.mail_adapter.as_str() {
        "console" => Ok(Arc::new(ConsoleMailer::new(config.mail_from.clone()))),
        "smtp" => {
            let host = config
                .smtp_host
                .clone()
                .ok_or_else(|| EmailError::Config("SMTP_HOST is required for SMTP adapter".to_string()))?;

            Ok(Arc::new(SmtpMailer::new(
                &host,
                config.smtp_port,
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
                &config.mail_from,
            )?))
        }
        other => Err(EmailError::Config(format!("Unknown MAIL_ADAPTER: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invitation_body_contains_link_and_role() {
        let to = Email::parse("invitee@example.com").unwrap();
        let message = EmailMessage::invitation(
            to,
            "Acme",
            "owner@example.com",
            "admin",
            "http://localhost:3000/invite/01ABC",
        );
        assert_eq!(message.subject, "You've been invited to join Acme");
        assert!(message.body.contains("http://localhost:3000/invite/01ABC"));
        assert!(message.body.contains("as admin"));
    }

    #[test]
    fn unknown_adapter_is_rejected() {
        let mut config = Config::for_tests();
        config.mail_adapter = "carrier-pigeon".to_string();
        assert!(matches!(from_config(&config), Err(EmailError::Config(_))));
    }

    #[test]
    fn smtp_requires_host() {
        let mut config = Config::for_tests();
        config.mail_adapter = "smtp".to_string();
        assert!(matches!(from_config(&config), Err(EmailError::Config(_))));
    }
}
