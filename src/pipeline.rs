//! # Upload Pipeline
//!
//! [`Uploader`] wires the stages together: capability flags → file reader →
//! image resizer → request builder → transport. One call handles one
//! attempt; every terminal error is surfaced exactly once through the
//! settings' error callback.
//!
//! `Ok(None)` means the attempt ended before any request existed —
//! validation stop, swallowed abort, or no viable body strategy.
//! `Ok(Some(response))` means the request was dispatched; HTTP-level
//! failures come back as `Err` for the caller to handle, untouched.

use std::sync::Arc;

use crate::capability::Capabilities;
use crate::dataurl;
use crate::error::UploadError;
use crate::file::{FileInfo, SelectedFile};
use crate::image::image_rs::ImageRsResizer;
use crate::image::processor::{ImageResizer, ResizeOpts, ResizeOutput};
use crate::image::resize_with_watchdog;
use crate::reader::{self, ReadOutcome};
use crate::request::{self, PayloadSource};
use crate::settings::UploadSettings;
use crate::transport::Transport;

/// The assembled pipeline. Cheap to share behind an `Arc`; holds no
/// per-attempt state.
pub struct Uploader {
    caps: Capabilities,
    resizer: Arc<dyn ImageResizer>,
    transport: Transport,
}

impl Uploader {
    /// Pipeline over the process-wide capability probe, the `image`-crate
    /// resizer, and a fresh HTTP client.
    pub fn new() -> Self {
        Self::with_parts(
            Capabilities::global(),
            Arc::new(ImageRsResizer),
            Transport::new(),
        )
    }

    pub fn with_parts(
        caps: Capabilities,
        resizer: Arc<dyn ImageResizer>,
        transport: Transport,
    ) -> Self {
        Self {
            caps,
            resizer,
            transport,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Runs one upload attempt end to end.
    pub async fn upload(
        &self,
        file: SelectedFile,
        settings: &UploadSettings,
    ) -> Result<Option<reqwest::Response>, reqwest::Error> {
        if !self.caps.can_upload_binary {
            tracing::error!("binary upload unsupported; skipping attempt");
            return Ok(None);
        }

        let info = match file.info().await {
            Ok(info) => info,
            Err(err) => {
                settings.report(&file.describe(), &err);
                return Ok(None);
            }
        };

        let plan = match reader::read_for_upload(&file, &info, settings, &self.caps).await {
            Ok(plan) => plan,
            Err(err) => {
                settings.report(&info, &err);
                return Ok(None);
            }
        };

        let (source, info) = match plan.outcome {
            ReadOutcome::Handle => (PayloadSource::Handle(file.clone()), info),
            ReadOutcome::Raw(bytes) => (PayloadSource::Bytes(bytes), info),
            ReadOutcome::DataUrl(url) => match self.resize(&file, &info, settings, &url).await {
                Ok(pair) => pair,
                Err(err) => {
                    settings.report(&info, &err);
                    return Ok(None);
                }
            },
        };

        let payload = match request::build(&self.caps, source, &info).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return Ok(None),
            Err(err) => {
                settings.report(&info, &err);
                return Ok(None);
            }
        };

        let response = self.transport.dispatch(&settings.endpoint, payload).await?;
        Ok(Some(response))
    }

    /// Resize stage: decode under the watchdog, bypass when dimensions are
    /// unchanged, otherwise swap in the re-encoded bytes and metadata.
    async fn resize(
        &self,
        file: &SelectedFile,
        info: &FileInfo,
        settings: &UploadSettings,
        data_url: &str,
    ) -> Result<(PayloadSource, FileInfo), UploadError> {
        let (_, bytes) = dataurl::decode(data_url).map_err(|err| {
            tracing::error!(error = %err, "data URL payload did not decode");
            UploadError::NotImage
        })?;

        let opts = ResizeOpts {
            max_width: settings.image_max_width,
            max_height: settings.image_max_height,
            force: settings.force_resize,
            image_type: settings.image_type,
        };
        let outcome = resize_with_watchdog(
            self.resizer.clone(),
            bytes.clone(),
            info.content_type.clone(),
            opts,
            settings.decode_timeout,
        )
        .await?;

        match outcome {
            ResizeOutput::Unchanged => {
                tracing::info!(file = %info.name, "image dimensions unchanged; sending the original");
                let source = if self.caps.structured_multipart {
                    PayloadSource::Handle(file.clone())
                } else {
                    PayloadSource::Bytes(bytes)
                };
                Ok((source, info.clone()))
            }
            ResizeOutput::Resized {
                bytes,
                kind,
                width,
                height,
            } => {
                tracing::info!(
                    file = %info.name,
                    resized = format!("{width}x{height}"),
                    "image resized"
                );
                let new_info = info.resized(kind, bytes.len() as u64);
                let source = if self.caps.structured_multipart && self.caps.in_memory_file {
                    PayloadSource::Handle(SelectedFile::from_bytes(
                        new_info.name.clone(),
                        new_info.content_type.clone(),
                        bytes,
                    ))
                } else {
                    PayloadSource::Bytes(bytes)
                };
                Ok((source, new_info))
            }
        }
    }
}

impl Default for Uploader {
    fn default() -> Self {
        Self::new()
    }
}
