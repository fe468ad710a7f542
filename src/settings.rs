//! # Upload Settings
//!
//! The per-binding configuration bag: endpoint, validation constraints,
//! resize policy, watchdog deadline, and the error callback. Cloned for
//! every attempt, never persisted, never shared mutably.
//!
//! # Example
//! ```
//! use filedrop::settings::UploadSettings;
//! use regex::Regex;
//!
//! let settings = UploadSettings::new("http://localhost:3000/upload.json")
//!     .with_file_type(Regex::new(r"(?i)^(jpe?g|png)$").unwrap())
//!     .with_file_max_size(1_000_000);
//! assert!(!settings.resize_requested());
//!
//! let resizing = UploadSettings::new("http://localhost:3000/upload.json")
//!     .with_image_bounds(Some(800), Some(800));
//! assert!(resizing.resize_requested());
//! ```

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;

use crate::error::UploadError;
use crate::file::FileInfo;
use crate::image::processor::ImageType;

/// Callback invoked once per failed attempt with the file metadata and the
/// error (kind token and human message both hang off [`UploadError`]).
pub type ErrorCallback = Arc<dyn Fn(&FileInfo, &UploadError) + Send + Sync>;

/// Default decode-watchdog deadline; tuned for local files, caller-tunable.
pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_millis(200);

/// Configuration for one binding. Request options beyond the endpoint are
/// layered on through the transport's pre-send middleware.
#[derive(Clone)]
pub struct UploadSettings {
    /// Where the POST goes.
    pub endpoint: String,
    /// Pattern tested against the filename extension (non-resize mode only).
    pub file_type: Option<Regex>,
    /// Maximum byte size (non-resize mode only).
    pub file_max_size: Option<u64>,
    /// Either bound set enables resize mode.
    pub image_max_width: Option<u32>,
    pub image_max_height: Option<u32>,
    /// Fall back to uploading the original image, with ordinary constraints
    /// enforced, when resizing is unsupported.
    pub allow_upload_original_image: bool,
    /// Re-sample even when the resized dimensions equal the original.
    pub force_resize: bool,
    /// Output encoding policy for resized images.
    pub image_type: ImageType,
    /// Watchdog deadline for the image decode.
    pub decode_timeout: Duration,
    /// Failure reporter; defaults to a `tracing::error!` log line.
    pub file_error: ErrorCallback,
}

impl UploadSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            file_type: None,
            file_max_size: None,
            image_max_width: None,
            image_max_height: None,
            allow_upload_original_image: false,
            force_resize: false,
            image_type: ImageType::Auto,
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
            file_error: default_error_callback(),
        }
    }

    pub fn with_file_type(mut self, pattern: Regex) -> Self {
        self.file_type = Some(pattern);
        self
    }

    pub fn with_file_max_size(mut self, bytes: u64) -> Self {
        self.file_max_size = Some(bytes);
        self
    }

    pub fn with_image_bounds(mut self, max_width: Option<u32>, max_height: Option<u32>) -> Self {
        self.image_max_width = max_width;
        self.image_max_height = max_height;
        self
    }

    pub fn with_allow_upload_original_image(mut self, allow: bool) -> Self {
        self.allow_upload_original_image = allow;
        self
    }

    pub fn with_force_resize(mut self, force: bool) -> Self {
        self.force_resize = force;
        self
    }

    pub fn with_image_type(mut self, image_type: ImageType) -> Self {
        self.image_type = image_type;
        self
    }

    pub fn with_decode_timeout(mut self, deadline: Duration) -> Self {
        self.decode_timeout = deadline;
        self
    }

    pub fn with_file_error(mut self, callback: ErrorCallback) -> Self {
        self.file_error = callback;
        self
    }

    /// Resize mode is on when either bound is set.
    pub fn resize_requested(&self) -> bool {
        self.image_max_width.is_some() || self.image_max_height.is_some()
    }

    /// Routes a failure to the callback, except for silent errors.
    pub fn report(&self, info: &FileInfo, err: &UploadError) {
        if err.is_silent() {
            return;
        }
        (self.file_error)(info, err);
    }
}

impl std::fmt::Debug for UploadSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadSettings")
            .field("endpoint", &self.endpoint)
            .field("file_type", &self.file_type.as_ref().map(|r| r.as_str()))
            .field("file_max_size", &self.file_max_size)
            .field("image_max_width", &self.image_max_width)
            .field("image_max_height", &self.image_max_height)
            .field(
                "allow_upload_original_image",
                &self.allow_upload_original_image,
            )
            .field("force_resize", &self.force_resize)
            .field("image_type", &self.image_type)
            .field("decode_timeout", &self.decode_timeout)
            .finish_non_exhaustive()
    }
}

fn default_error_callback() -> ErrorCallback {
    Arc::new(|info: &FileInfo, err: &UploadError| {
        tracing::error!(file = %info.name, kind = err.token(), "{err}");
    })
}
