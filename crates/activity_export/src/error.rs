use sea_orm::DbErr;
use thiserror::Error;

use crate::mail::MailError;

/// Errors that can occur while producing or delivering an activity export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// No site is registered under the requested domain.
    #[error("Site not found: {domain}")]
    SiteNotFound { domain: String },

    /// The recipient address is empty or malformed.
    #[error("Invalid recipient address: '{address}'")]
    InvalidRecipient { address: String },

    /// Spreadsheet rendering failed.
    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// Writing the workbook to disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mail could not be built or delivered.
    #[error(transparent)]
    Mail(#[from] MailError),
}

impl ExportError {
    /// Create a SiteNotFound error for a domain lookup.
    #[inline]
    pub fn site_not_found(domain: impl Into<String>) -> Self {
        Self::SiteNotFound {
            domain: domain.into(),
        }
    }

    /// Create an InvalidRecipient error.
    #[inline]
    pub fn invalid_recipient(address: impl Into<String>) -> Self {
        Self::InvalidRecipient {
            address: address.into(),
        }
    }

    /// Whether this error was caused by caller input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::SiteNotFound { .. } | Self::InvalidRecipient { .. }
        )
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
