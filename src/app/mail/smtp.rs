use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};

use super::{EmailError, EmailMessage, EmailSender};

/// SMTP email sender using STARTTLS.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport. The from address is parsed here so a bad
    /// `MAIL_FROM` fails at startup rather than on the first invitation.
    pub fn new(
        host: &str,
        port: u16,
        user: Option<String>,
        pass: Option<String>,
        from: &str,
    ) -> Result<Self, EmailError> {
        let from: Mailbox = from
            .parse()
            .map_err(|e| EmailError::Config(format!("Invalid from address '{}': {}", from, e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| EmailError::Config(format!("Invalid SMTP host '{}': {}", host, e)))?
            .port(port);

        if let (Some(user), Some(pass)) = (user, pass) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let to: Mailbox = message
            .to
            .as_str()
            .parse()
            .map_err(|e| EmailError::Config(format!("Invalid to address '{}': {}", message.to, e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| EmailError::Send(format!("Failed to build email message: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| EmailError::Smtp(format!("SMTP send failed: {}", e)))
    }
}
