//! # File Reader
//!
//! First pipeline stage after a trigger: decides whether this attempt is a
//! resize attempt, enforces the caller's constraints when it is not, and
//! picks how the file content reaches the request builder — as the untouched
//! handle (zero-copy, structured bodies only), as a data URL (resize mode),
//! or as raw bytes.
//!
//! Validation runs only in non-resize mode, mirroring the constraint that a
//! resized image has neither its original size nor, potentially, its
//! original type.

use crate::capability::Capabilities;
use crate::dataurl;
use crate::error::UploadError;
use crate::file::{FileInfo, SelectedFile};
use crate::settings::UploadSettings;

/// How the file content travels to the request builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Pass the handle through untouched; the builder streams it.
    Handle,
    /// Full content as a base64 data URL, ready for the resizer.
    DataUrl(String),
    /// Full content as raw bytes for the hand-assembled body.
    Raw(Vec<u8>),
}

/// Outcome plus the resolved resize decision for the rest of the attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadPlan {
    pub outcome: ReadOutcome,
    pub resize: bool,
}

/// Validates and reads one selected file.
///
/// Errors stop the pipeline before any request exists; the caller routes
/// them to the error callback (aborted reads stay silent).
pub async fn read_for_upload(
    file: &SelectedFile,
    info: &FileInfo,
    settings: &UploadSettings,
    caps: &Capabilities,
) -> Result<ReadPlan, UploadError> {
    let mut resize = settings.resize_requested();

    if resize && !caps.can_resize_images && settings.allow_upload_original_image {
        tracing::warn!(file = %info.name, "falling back to uploading the original un-resized image");
        resize = false;
    }

    if !resize {
        if let Some(pattern) = &settings.file_type {
            if !pattern.is_match(info.extension()) {
                tracing::error!(file = %info.name, "invalid filetype");
                return Err(UploadError::InvalidFiletype);
            }
        }
        if let Some(max) = settings.file_max_size {
            if info.size > max {
                tracing::error!(file = %info.name, size = info.size, max, "file exceeds size limit");
                return Err(UploadError::FileExceedsSizeLimit);
            }
        }
    }

    let outcome = if !resize && caps.structured_multipart {
        tracing::info!(file = %info.name, "bypassing the read; handle goes straight into the structured body");
        ReadOutcome::Handle
    } else if resize {
        let bytes = file.read().await?;
        ReadOutcome::DataUrl(dataurl::encode(&info.content_type, &bytes))
    } else {
        let bytes = file.read().await?;
        ReadOutcome::Raw(bytes)
    };

    Ok(ReadPlan { outcome, resize })
}
