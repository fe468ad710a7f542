//! # Upload Error Taxonomy
//!
//! Every way an upload attempt can stop before dispatch, with a stable
//! machine token and a human-readable message for each kind.
//!
//! All of these are non-fatal: they terminate one attempt, get surfaced once
//! through the caller's error callback, and leave no shared state behind.
//! [`UploadError::Aborted`] is the one exception — a user-initiated read
//! abort is deliberately never reported.
//!
//! # Example
//! ```
//! use filedrop::error::UploadError;
//!
//! let err = UploadError::InvalidFiletype;
//! assert_eq!(err.token(), "INVALID_FILETYPE");
//! assert_eq!(err.to_string(), "Invalid filetype.");
//! ```

use std::io;

use thiserror::Error;

/// Reasons an upload attempt ends without a request being dispatched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Filename extension failed the caller-supplied pattern.
    #[error("Invalid filetype.")]
    InvalidFiletype,
    /// File byte size exceeds the caller-supplied maximum.
    #[error("File exceeds size limit.")]
    FileExceedsSizeLimit,
    /// The selected file no longer exists.
    #[error("File not found.")]
    FileNotFound,
    /// The file exists but could not be read.
    #[error("File not readable.")]
    Io,
    /// Reading the file was denied by the platform.
    #[error("File cannot be accessed due to security constraints.")]
    Security,
    /// The payload did not decode as a supported image within the watchdog
    /// deadline.
    #[error("File is not a supported image format.")]
    NotImage,
    /// The read was aborted by the user. Swallowed, never reported.
    #[error("Read aborted.")]
    Aborted,
}

impl UploadError {
    /// Stable token passed to the error callback alongside the message.
    pub fn token(&self) -> &'static str {
        match self {
            UploadError::InvalidFiletype => "INVALID_FILETYPE",
            UploadError::FileExceedsSizeLimit => "FILE_EXCEEDS_SIZE_LIMIT",
            UploadError::FileNotFound => "FILE_NOT_FOUND",
            UploadError::Io => "IO_ERROR",
            UploadError::Security => "SECURITY_ERROR",
            UploadError::NotImage => "FILE_NOT_IMAGE",
            UploadError::Aborted => "ABORTED",
        }
    }

    /// Whether this error bypasses the error callback entirely.
    pub fn is_silent(&self) -> bool {
        matches!(self, UploadError::Aborted)
    }

    /// Maps an I/O failure from a file read onto the taxonomy.
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => UploadError::FileNotFound,
            io::ErrorKind::PermissionDenied => UploadError::Security,
            io::ErrorKind::Interrupted => UploadError::Aborted,
            _ => UploadError::Io,
        }
    }
}
