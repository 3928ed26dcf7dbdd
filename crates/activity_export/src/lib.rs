//! Activity Export - site-scoped user activity reports for an ideas platform.
//!
//! For one site this library classifies every user as active (created a
//! challenge, idea or idea vote) or inactive, renders the result as a
//! two-sheet `.xlsx` workbook, and mails it to a supplied recipient when the
//! site has at least one manager.
//!
//! # Features
//!
//! - `sqlite` / `postgres` - Database drivers.
//! - `migrate` - Enables the schema migrator and [`connect_and_migrate`].
//! - `smtp` - Enables [`mail::SmtpMailer`].
//!
//! # Example
//!
//! ```ignore
//! use activity_export::{ExportOptions, MemoryMailer, connect_and_migrate, run_export};
//!
//! let db = connect_and_migrate("sqlite://ideas.db?mode=rwc").await?;
//! let mailer = MemoryMailer::new();
//!
//! let summary = run_export(
//!     &db,
//!     &mailer,
//!     "example.com",
//!     "manager@example.com",
//!     &ExportOptions::default(),
//! )
//! .await?;
//! assert!(summary.email_sent());
//! ```

pub mod activity;
pub mod db;
pub mod entity;
pub mod error;
pub mod export;
pub mod mail;
pub mod notify;
pub mod report;

#[cfg(feature = "migrate")]
pub mod migration;

pub use activity::{ActiveUser, Activity, ActivityKind, ActivityReport, SiteActivity};
pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use error::{ExportError, Result};
pub use export::{ExportOptions, ExportSummary, build_report, run_export};
pub use mail::{Attachment, MailError, Mailer, MemoryMailer, OutgoingEmail};
pub use notify::{EXPORT_SUBJECT, NotifyOutcome};
