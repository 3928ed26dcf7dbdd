//! Outgoing mail.
//!
//! [`Mailer`] is the seam between the export pipeline and a mail transport.
//! [`MemoryMailer`] keeps sent messages in an in-process outbox (used by tests
//! and dry runs); [`SmtpMailer`] delivers through an SMTP relay when the `smtp`
//! feature is enabled.

mod error;
mod memory;
#[cfg(feature = "smtp")]
mod smtp;

use async_trait::async_trait;
use serde::Serialize;

pub use error::{MailError, Result};
pub use memory::MemoryMailer;
#[cfg(feature = "smtp")]
pub use smtp::{SmtpMailer, SmtpSecurity, SmtpSettings, build_message};

/// A file attached to an email.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// A fully addressed email ready to hand to a [`Mailer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

/// Something that can deliver an [`OutgoingEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}
