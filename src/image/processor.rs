//! # Image Resizing Abstractions
//!
//! Defines the resizer seam and its option types:
//! - [`ResizeOpts`] — bounding box, force flag, and output-type policy.
//! - [`ImageType`] / [`ImageKind`] — requested vs. resolved output encoding.
//! - [`ResizeOutput`] — either a bypass or the re-encoded result.
//! - [`ImageResizer`] — trait abstraction so the pipeline can run against
//!   stub backends in tests.
//!
//! The contract for implementors: decode, scale to fit the box while
//! preserving aspect ratio, never upscale, and signal an untouched bypass
//! when the target dimensions match the source and `force` is unset.

use anyhow::Result;
use image::{DynamicImage, ImageFormat};

/// Requested output encoding for a resized image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
    /// Keep JPEG sources as JPEG, re-encode everything else as PNG.
    #[default]
    Auto,
}

impl ImageType {
    /// Resolves the policy against the source MIME type.
    pub fn pick(self, source_type: &str) -> ImageKind {
        match self {
            ImageType::Jpeg => ImageKind::Jpeg,
            ImageType::Png => ImageKind::Png,
            ImageType::Auto => {
                if source_type.eq_ignore_ascii_case("image/jpeg") {
                    ImageKind::Jpeg
                } else {
                    ImageKind::Png
                }
            }
        }
    }
}

/// A concrete output encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
        }
    }
}

/// Options for one resize operation.
///
/// Unset bounds are unbounded; the ratio math treats them as infinite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResizeOpts {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Re-sample even when the target dimensions equal the source.
    pub force: bool,
    pub image_type: ImageType,
}

/// Result of a resize operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResizeOutput {
    /// Source already fits the box; forward the original bytes unchanged.
    Unchanged,
    /// Re-encoded image plus the metadata the new [`crate::file::FileInfo`]
    /// is built from.
    Resized {
        bytes: Vec<u8>,
        kind: ImageKind,
        width: u32,
        height: u32,
    },
}

/// Trait defining the resizer seam.
///
/// Decode and the resample/encode pass are separate steps: the pipeline
/// races only the decode against its watchdog deadline.
pub trait ImageResizer: Send + Sync {
    /// Decodes `bytes` into an image. An undecodable payload is an
    /// `anyhow::Error`; the caller folds it into the not-an-image taxonomy.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage>;

    /// Scales a decoded image to fit the box in `opts`, preserving aspect
    /// ratio and never upscaling, then re-encodes.
    ///
    /// Returns [`ResizeOutput::Unchanged`] for the bypass case.
    fn process(
        &self,
        image: DynamicImage,
        source_type: &str,
        opts: &ResizeOpts,
    ) -> Result<ResizeOutput>;

    /// Both steps back to back, for callers with no deadline to honor.
    fn resize(&self, bytes: &[u8], source_type: &str, opts: &ResizeOpts) -> Result<ResizeOutput> {
        self.process(self.decode(bytes)?, source_type, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockResizer {
        calls: Mutex<Vec<(String, ResizeOpts)>>,
    }

    impl ImageResizer for MockResizer {
        fn decode(&self, _bytes: &[u8]) -> Result<DynamicImage> {
            Ok(DynamicImage::new_rgba8(1, 1))
        }

        fn process(
            &self,
            _image: DynamicImage,
            source_type: &str,
            opts: &ResizeOpts,
        ) -> Result<ResizeOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((source_type.to_string(), *opts));
            Ok(ResizeOutput::Resized {
                bytes: vec![0xAA],
                kind: ImageKind::Png,
                width: 1,
                height: 1,
            })
        }
    }

    #[test]
    fn auto_keeps_jpeg_and_defaults_to_png() {
        assert_eq!(ImageType::Auto.pick("image/jpeg"), ImageKind::Jpeg);
        assert_eq!(ImageType::Auto.pick("IMAGE/JPEG"), ImageKind::Jpeg);
        assert_eq!(ImageType::Auto.pick("image/png"), ImageKind::Png);
        assert_eq!(ImageType::Auto.pick("image/gif"), ImageKind::Png);
        assert_eq!(ImageType::Jpeg.pick("image/png"), ImageKind::Jpeg);
        assert_eq!(ImageType::Png.pick("image/jpeg"), ImageKind::Png);
    }

    #[test]
    fn kind_metadata_is_consistent() {
        assert_eq!(ImageKind::Jpeg.mime(), "image/jpeg");
        assert_eq!(ImageKind::Jpeg.extension(), "jpeg");
        assert_eq!(ImageKind::Png.mime(), "image/png");
        assert_eq!(ImageKind::Png.format(), ImageFormat::Png);
    }

    #[test]
    fn mock_resizer_records_calls() {
        let mock = Arc::new(MockResizer::default());
        let seam: Arc<dyn ImageResizer> = mock.clone();

        let opts = ResizeOpts {
            max_width: Some(80),
            max_height: Some(60),
            force: true,
            image_type: ImageType::Png,
        };
        let out = seam.resize(b"x", "image/png", &opts).unwrap();
        assert!(matches!(out, ResizeOutput::Resized { .. }));

        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "image/png");
        assert_eq!(calls[0].1, opts);
    }

    fn assert_send_sync<T: ?Sized + Send + Sync>() {}
    #[test]
    fn dyn_resizer_is_send_sync() {
        assert_send_sync::<dyn ImageResizer>();
    }
}
