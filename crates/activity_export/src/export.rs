//! The end-to-end export: classify a site's users, render the workbook and
//! mail it when the site has managers.

use std::path::PathBuf;

use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::activity::{self, ActivityReport};
use crate::error::{ExportError, Result};
use crate::mail::{Attachment, Mailer};
use crate::notify::{self, Delivery, NotifyOutcome};
use crate::report;

/// Sender used when none is configured.
pub const DEFAULT_FROM: &str = "noreply@localhost";

/// Knobs for [`run_export`].
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Where to write the workbook. `None` keeps it in memory only.
    pub output_path: Option<PathBuf>,
    /// Sender address of the email.
    pub from: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            from: DEFAULT_FROM.to_string(),
        }
    }
}

/// What an export run did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub site_domain: String,
    pub active: usize,
    pub inactive: usize,
    pub output_path: Option<PathBuf>,
    pub notify: NotifyOutcome,
}

impl ExportSummary {
    pub fn email_sent(&self) -> bool {
        self.notify.was_sent()
    }
}

/// Reject recipients that are blank or lack a local part or domain.
pub fn validate_recipient(address: &str) -> Result<&str> {
    let trimmed = address.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(trimmed),
        _ => Err(ExportError::invalid_recipient(address)),
    }
}

/// Classify every user on the site with the given domain.
///
/// # Errors
/// Returns `ExportError::SiteNotFound` if no site has that domain.
pub async fn build_report(db: &DatabaseConnection, site_domain: &str) -> Result<ActivityReport> {
    let site = activity::find_site_by_domain(db, site_domain)
        .await?
        .ok_or_else(|| ExportError::site_not_found(site_domain))?;
    Ok(activity::load_site_activity(db, &site).await?.classify())
}

fn email_body(site_domain: &str, report: &ActivityReport) -> String {
    format!(
        "User activity export for {site_domain}.\n\n\
         Active users: {}\n\
         Users with no activity: {}\n\n\
         The full report is attached as {}.\n",
        report.active_count(),
        report.inactive_count(),
        report::DEFAULT_FILENAME,
    )
}

/// Run the export for `site_domain` and mail it to `recipient`.
///
/// Steps:
/// 1. validate the recipient and resolve the site
/// 2. load and classify the site's users
/// 3. render the workbook, writing it to `options.output_path` when set
/// 4. send one email to `recipient` if the site has at least one manager
///
/// # Errors
/// Returns `ExportError::InvalidRecipient` or `ExportError::SiteNotFound` for
/// bad input, and database, workbook, I/O or mail errors otherwise.
pub async fn run_export<M>(
    db: &DatabaseConnection,
    mailer: &M,
    site_domain: &str,
    recipient: &str,
    options: &ExportOptions,
) -> Result<ExportSummary>
where
    M: Mailer + ?Sized,
{
    let recipient = validate_recipient(recipient)?;
    tracing::info!(site = %site_domain, to = %recipient, "Starting activity export");

    let site = activity::find_site_by_domain(db, site_domain)
        .await?
        .ok_or_else(|| ExportError::site_not_found(site_domain))?;

    let report = activity::load_site_activity(db, &site).await?.classify();
    tracing::info!(
        site = %site.domain,
        active = report.active_count(),
        inactive = report.inactive_count(),
        "Classified users"
    );

    let workbook = match &options.output_path {
        Some(path) => report::write_workbook(&report, path)?,
        None => report::render_workbook(&report)?,
    };

    let delivery = Delivery {
        from: options.from.clone(),
        body: email_body(&site.domain, &report),
        attachment: Attachment {
            filename: report::DEFAULT_FILENAME.to_string(),
            content_type: report::XLSX_CONTENT_TYPE.to_string(),
            content: workbook,
        },
    };
    let notify = notify::notify_managers(db, mailer, &site, recipient, delivery).await?;

    Ok(ExportSummary {
        site_domain: site.domain,
        active: report.active_count(),
        inactive: report.inactive_count(),
        output_path: options.output_path.clone(),
        notify,
    })
}
