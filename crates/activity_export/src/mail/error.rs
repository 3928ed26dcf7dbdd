use thiserror::Error;

/// Errors that can occur while building or delivering an email.
#[derive(Debug, Error)]
pub enum MailError {
    /// A sender or recipient address could not be parsed.
    #[error("Invalid email address '{address}': {reason}")]
    Address { address: String, reason: String },

    /// The message could not be assembled.
    #[error("Failed to build email: {message}")]
    Build { message: String },

    /// The transport rejected or failed to deliver the message.
    #[error("Mail transport error: {message}")]
    Transport { message: String },
}

impl MailError {
    /// Create an Address error.
    #[inline]
    pub fn address(address: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Address {
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a Build error.
    #[inline]
    pub fn build(message: impl std::fmt::Display) -> Self {
        Self::Build {
            message: message.to_string(),
        }
    }

    /// Create a Transport error.
    #[inline]
    pub fn transport(message: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: message.to_string(),
        }
    }
}

/// Result type alias for mail operations.
pub type Result<T> = std::result::Result<T, MailError>;
