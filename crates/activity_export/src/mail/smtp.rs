use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};

use super::{MailError, Mailer, OutgoingEmail, Result};

/// How the SMTP connection is secured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection. Only suitable for local relays.
    #[default]
    None,
    /// Upgrade a plain connection with STARTTLS.
    StartTls,
    /// Implicit TLS from the first byte.
    Tls,
}

impl std::str::FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "plain" => Ok(Self::None),
            "starttls" => Ok(Self::StartTls),
            "tls" | "ssl" => Ok(Self::Tls),
            other => Err(format!("unknown SMTP security mode: {other}")),
        }
    }
}

/// Connection settings for [`SmtpMailer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub security: SmtpSecurity,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            username: None,
            password: None,
            security: SmtpSecurity::None,
        }
    }
}

/// Mailer that delivers through an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a mailer for the given relay. No connection is opened until the
    /// first message is sent.
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let builder = match settings.security {
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
            }
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(MailError::transport)?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(MailError::transport)?,
        };

        let mut builder = builder.port(settings.port);
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MailError::address(address, e))
}

/// Convert an [`OutgoingEmail`] into a MIME message: a plain-text body
/// followed by one part per attachment.
pub fn build_message(email: &OutgoingEmail) -> Result<Message> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone());
    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::plain(email.body.clone()));
    for attachment in &email.attachments {
        let content_type =
            ContentType::parse(&attachment.content_type).map_err(MailError::build)?;
        body = body.singlepart(
            MimeAttachment::new(attachment.filename.clone())
                .body(attachment.content.clone(), content_type),
        );
    }

    builder.multipart(body).map_err(MailError::build)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let message = build_message(&email)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(MailError::transport)?;
        tracing::info!(
            to = ?email.to,
            subject = %email.subject,
            code = %response.code(),
            "Sent email via SMTP"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::Attachment;

    fn sample_email() -> OutgoingEmail {
        OutgoingEmail {
            from: "noreply@example.com".to_string(),
            to: vec!["manager@example.com".to_string()],
            subject: "User Activity Export".to_string(),
            body: "Report attached.".to_string(),
            attachments: vec![Attachment {
                filename: "user_activity_export.xlsx".to_string(),
                content_type:
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                        .to_string(),
                content: b"PK\x03\x04".to_vec(),
            }],
        }
    }

    #[test]
    fn build_message_sets_headers_and_envelope() {
        let message = build_message(&sample_email()).expect("message should build");

        let recipients: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(recipients, ["manager@example.com"]);

        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("Subject: User Activity Export"));
        assert!(raw.contains("user_activity_export.xlsx"));
        assert!(raw.contains("multipart/mixed"));
    }

    #[test]
    fn build_message_rejects_bad_recipient() {
        let mut email = sample_email();
        email.to = vec!["not an address".to_string()];

        let err = build_message(&email).unwrap_err();
        assert!(matches!(err, MailError::Address { .. }));
    }

    #[test]
    fn build_message_rejects_bad_content_type() {
        let mut email = sample_email();
        email.attachments[0].content_type = "nonsense".to_string();

        let err = build_message(&email).unwrap_err();
        assert!(matches!(err, MailError::Build { .. }));
    }

    #[test]
    fn smtp_security_parses_aliases() {
        assert_eq!("none".parse::<SmtpSecurity>(), Ok(SmtpSecurity::None));
        assert_eq!("STARTTLS".parse::<SmtpSecurity>(), Ok(SmtpSecurity::StartTls));
        assert_eq!("ssl".parse::<SmtpSecurity>(), Ok(SmtpSecurity::Tls));
        assert!("carrier-pigeon".parse::<SmtpSecurity>().is_err());
    }

    #[tokio::test]
    async fn new_accepts_plain_local_relay() {
        let settings = SmtpSettings {
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
            ..SmtpSettings::default()
        };
        assert!(SmtpMailer::new(&settings).is_ok());
    }
}
