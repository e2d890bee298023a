use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed record at {key}: {reason}")]
    Malformed { key: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns a stable error code for this error variant.
    /// These codes are stable and can be used by callers for error classification.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "IO_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Malformed { .. } => "MALFORMED_RECORD",
            Error::NotFound(_) => "NOT_FOUND",
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Error::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            Error::Corruption(_) => "CORRUPTION",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if this error should surface as a transient notice
    /// instead of aborting the operation.
    ///
    /// A malformed record or an unknown link leaves the editor usable, while
    /// a failing backing store does not.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Error::Malformed { .. } => true,
            Error::NotFound(_) => true,
            Error::InvalidIdentifier(_) => true,

            Error::Io(_) => false,
            Error::Serialization(_) => false,
            Error::InvalidArgument(_) => false,
            Error::QuotaExceeded(_) => false,
            Error::Corruption(_) => false,
            Error::Internal(_) => false,
        }
    }

    /// Adds context to an error by wrapping it in an Internal error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use snote_core::Error;
    ///
    /// fn write_slot() -> Result<(), Error> {
    ///     Err(Error::Io(std::io::Error::new(
    ///         std::io::ErrorKind::PermissionDenied,
    ///         "read-only profile"
    ///     )))
    /// }
    ///
    /// fn save_draft() -> Result<(), Error> {
    ///     write_slot().map_err(|e| e.with_context("failed to save draft"))
    /// }
    /// ```
    pub fn with_context(self, context: &str) -> Error {
        Error::Internal(format!("{}: {}", context, self))
    }

    /// Error for a stored value under `key` that did not parse
    pub fn malformed(key: &str, reason: impl ToString) -> Error {
        Error::Malformed {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
