//! Unified error types for chathisto.
//!
//! This module provides a single [`ChathistoError`] enum that covers every
//! fatal condition of a run. Entries that are merely not text messages
//! (stickers, service notices, forwarded blocks) are never errors: the
//! extractor skips them before anything here is constructed.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **CLI users** get a message naming the offending file and the reason
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chathisto operations.
///
/// # Example
///
/// ```rust
/// use chathisto::error::Result;
/// use chathisto::MessageRecord;
///
/// fn first_record() -> Result<MessageRecord> {
///     MessageRecord::parse("29.05.2019 11:26:30")
/// }
/// # assert!(first_record().is_ok());
/// ```
pub type Result<T> = std::result::Result<T, ChathistoError>;

/// The error type for all chathisto operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChathistoError {
    /// An I/O error occurred outside of fragment reading and listing.
    ///
    /// Typically an output file cannot be created or written.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A timestamp attribute did not match `DD.MM.YYYY HH:MM:SS`.
    ///
    /// This signals export-format drift rather than ordinary heterogeneity,
    /// so the run stops instead of silently dropping the message.
    #[error("Invalid timestamp '{input}'{}. Expected format: {expected}", fragment.as_ref().map(|f| format!(" in {f}")).unwrap_or_default())]
    Timestamp {
        /// The attribute value as found in the document
        input: String,
        /// Expected format description
        expected: &'static str,
        /// The fragment the value came from, once known
        fragment: Option<String>,
    },

    /// The export directory could not be listed.
    #[error("Cannot list directory {}: {source}", path.display())]
    Listing {
        /// The directory that was being listed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A fragment could not be read or decoded as a document.
    #[error("Unreadable fragment {}: {reason}", path.display())]
    UnreadableFragment {
        /// Location of the fragment
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A configuration value was rejected before any work started.
    ///
    /// Covers zero bin counts, malformed date templates, bad CSS selectors
    /// and unparsable UTC offsets.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the rejected value
        message: String,
    },

    /// The output file extension doesn't name a known export format.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The kind of format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 encoding error while assembling output.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl From<std::string::FromUtf8Error> for ChathistoError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChathistoError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChathistoError {
    /// Creates a timestamp format error without fragment context.
    pub fn timestamp(input: impl Into<String>) -> Self {
        ChathistoError::Timestamp {
            input: input.into(),
            expected: "DD.MM.YYYY HH:MM:SS",
            fragment: None,
        }
    }

    /// Creates an unreadable fragment error.
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ChathistoError::UnreadableFragment {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a directory listing error.
    pub fn listing(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChathistoError::Listing {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ChathistoError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChathistoError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Attaches the fragment name to a timestamp error.
    ///
    /// Other variants already carry their own location and are returned
    /// unchanged.
    #[must_use]
    pub fn in_fragment(self, name: &str) -> Self {
        match self {
            ChathistoError::Timestamp {
                input,
                expected,
                fragment: None,
            } => ChathistoError::Timestamp {
                input,
                expected,
                fragment: Some(name.to_string()),
            },
            other => other,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChathistoError::Io(_))
    }

    /// Returns `true` if this is a timestamp format error.
    pub fn is_timestamp(&self) -> bool {
        matches!(self, ChathistoError::Timestamp { .. })
    }

    /// Returns `true` if the export directory could not be listed.
    pub fn is_listing(&self) -> bool {
        matches!(self, ChathistoError::Listing { .. })
    }

    /// Returns `true` if a fragment could not be read or decoded.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, ChathistoError::UnreadableFragment { .. })
    }

    /// Returns `true` if a configuration value was rejected.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ChathistoError::InvalidConfig { .. })
    }
}
