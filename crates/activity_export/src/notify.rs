//! Manager-gated delivery of the export email.
//!
//! The site's managers are only used as an existence check. The email always
//! goes to the single recipient supplied by the caller, and it is not sent at
//! all when the site has no managers.

use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::activity;
use crate::entity::site;
use crate::error::Result;
use crate::mail::{Attachment, Mailer, OutgoingEmail};

/// Subject line of every export email.
pub const EXPORT_SUBJECT: &str = "User Activity Export";

/// What the notifier needs besides the site and recipient.
#[derive(Clone, Debug)]
pub struct Delivery {
    pub from: String,
    pub body: String,
    pub attachment: Attachment,
}

impl Delivery {
    fn into_email(self, to: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: self.from,
            to: vec![to.to_string()],
            subject: EXPORT_SUBJECT.to_string(),
            body: self.body,
            attachments: vec![self.attachment],
        }
    }
}

/// Result of a notification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotifyOutcome {
    /// The site has no managers; nothing was sent.
    NoManagers,
    /// One email was sent.
    Sent { managers: usize },
}

impl NotifyOutcome {
    pub fn was_sent(&self) -> bool {
        matches!(self, NotifyOutcome::Sent { .. })
    }
}

/// Send the export to `to` if `site` has at least one manager.
pub async fn notify_managers<M>(
    db: &DatabaseConnection,
    mailer: &M,
    site: &site::Model,
    to: &str,
    delivery: Delivery,
) -> Result<NotifyOutcome>
where
    M: Mailer + ?Sized,
{
    let managers = activity::find_managers(db, site).await?;
    if managers.is_empty() {
        tracing::warn!(site = %site.domain, "No managers on site, skipping export email");
        return Ok(NotifyOutcome::NoManagers);
    }

    mailer.send(delivery.into_email(to)).await?;
    tracing::info!(
        site = %site.domain,
        to = %to,
        managers = managers.len(),
        "Sent activity export"
    );

    Ok(NotifyOutcome::Sent {
        managers: managers.len(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::prelude::Uuid;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::entity::user;
    use crate::mail::MemoryMailer;

    fn make_site() -> site::Model {
        site::Model {
            id: Uuid::new_v4(),
            domain: "example.com".to_string(),
            name: "Example".to_string(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn make_manager(site: &site::Model, email: &str) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            site_id: site.id,
            username: email.to_string(),
            email: email.to_string(),
            first_name: "Mr".to_string(),
            last_name: "Manager".to_string(),
            is_contributor: false,
            is_manager: true,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn delivery() -> Delivery {
        Delivery {
            from: "noreply@example.com".to_string(),
            body: "Report attached.".to_string(),
            attachment: Attachment {
                filename: "report.xlsx".to_string(),
                content_type: "application/octet-stream".to_string(),
                content: vec![1, 2, 3],
            },
        }
    }

    #[tokio::test]
    async fn no_managers_sends_nothing() {
        let site = make_site();
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let mailer = MemoryMailer::new();

        let outcome = notify_managers(&db, &mailer, &site, "manager@example.com", delivery())
            .await
            .unwrap();

        assert_eq!(outcome, NotifyOutcome::NoManagers);
        assert!(!outcome.was_sent());
        assert!(mailer.is_empty());
    }

    #[tokio::test]
    async fn managers_present_sends_one_email_to_supplied_recipient() {
        let site = make_site();
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![
                make_manager(&site, "boss@example.com"),
                make_manager(&site, "other-boss@example.com"),
            ]])
            .into_connection();
        let mailer = MemoryMailer::new();

        let outcome = notify_managers(&db, &mailer, &site, "reports@example.com", delivery())
            .await
            .unwrap();

        assert_eq!(outcome, NotifyOutcome::Sent { managers: 2 });
        let outbox = mailer.outbox();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].subject, EXPORT_SUBJECT);
        assert_eq!(outbox[0].to, ["reports@example.com"]);
        assert_eq!(outbox[0].attachments.len(), 1);
    }
}
