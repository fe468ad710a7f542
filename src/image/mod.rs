//! Image resizing: the trait seam, the `image`-crate backend, and the
//! watchdog wrapper the async pipeline calls through.

pub mod image_rs;
pub mod processor;

use std::sync::Arc;
use std::time::Duration;

use crate::error::UploadError;
use self::processor::{ImageResizer, ResizeOpts, ResizeOutput};

/// Runs a resize on the blocking pool, with a watchdog deadline on the
/// decode step only. Once the payload has decoded, the resample and
/// re-encode run unguarded however long they take.
///
/// The deadline is a best-effort heuristic against payloads that are not
/// decodable images, not a correctness guarantee: a legitimate image that
/// decodes slower than the deadline fails the same way. Callers tune it via
/// [`crate::settings::UploadSettings::decode_timeout`]. Timeouts, decode
/// failures, and a lost worker all collapse to [`UploadError::NotImage`].
pub async fn resize_with_watchdog(
    resizer: Arc<dyn ImageResizer>,
    bytes: Vec<u8>,
    source_type: String,
    opts: ResizeOpts,
    deadline: Duration,
) -> Result<ResizeOutput, UploadError> {
    let decoder = resizer.clone();
    let decode = tokio::task::spawn_blocking(move || decoder.decode(&bytes));
    let image = match tokio::time::timeout(deadline, decode).await {
        Err(_) => {
            tracing::error!(
                deadline_ms = deadline.as_millis() as u64,
                "image decode did not finish before the watchdog deadline"
            );
            return Err(UploadError::NotImage);
        }
        Ok(Err(join_err)) => {
            tracing::error!(error = %join_err, "decode worker failed");
            return Err(UploadError::NotImage);
        }
        Ok(Ok(Err(err))) => {
            tracing::error!(error = %err, "payload is not a decodable image");
            return Err(UploadError::NotImage);
        }
        Ok(Ok(Ok(image))) => image,
    };

    let work = tokio::task::spawn_blocking(move || resizer.process(image, &source_type, &opts));
    match work.await {
        Err(join_err) => {
            tracing::error!(error = %join_err, "resize worker failed");
            Err(UploadError::NotImage)
        }
        Ok(Err(err)) => {
            tracing::error!(error = %err, "image processing failed");
            Err(UploadError::NotImage)
        }
        Ok(Ok(out)) => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use super::processor::ImageKind;
    use super::*;
    use anyhow::bail;
    use image::DynamicImage;

    struct SlowDecoder(Duration);
    impl ImageResizer for SlowDecoder {
        fn decode(&self, _bytes: &[u8]) -> anyhow::Result<DynamicImage> {
            std::thread::sleep(self.0);
            Ok(DynamicImage::new_rgba8(1, 1))
        }

        fn process(
            &self,
            _image: DynamicImage,
            _source_type: &str,
            _opts: &ResizeOpts,
        ) -> anyhow::Result<ResizeOutput> {
            Ok(ResizeOutput::Unchanged)
        }
    }

    struct FailingDecoder;
    impl ImageResizer for FailingDecoder {
        fn decode(&self, _bytes: &[u8]) -> anyhow::Result<DynamicImage> {
            bail!("not an image")
        }

        fn process(
            &self,
            _image: DynamicImage,
            _source_type: &str,
            _opts: &ResizeOpts,
        ) -> anyhow::Result<ResizeOutput> {
            Ok(ResizeOutput::Unchanged)
        }
    }

    /// Instant decode, slow resample: exercises the deadline's scope.
    struct SlowSampler(Duration);
    impl ImageResizer for SlowSampler {
        fn decode(&self, _bytes: &[u8]) -> anyhow::Result<DynamicImage> {
            Ok(DynamicImage::new_rgba8(1, 1))
        }

        fn process(
            &self,
            _image: DynamicImage,
            _source_type: &str,
            _opts: &ResizeOpts,
        ) -> anyhow::Result<ResizeOutput> {
            std::thread::sleep(self.0);
            Ok(ResizeOutput::Resized {
                bytes: vec![9, 9],
                kind: ImageKind::Png,
                width: 2,
                height: 2,
            })
        }
    }

    #[tokio::test]
    async fn slow_decode_hits_the_watchdog() {
        let out = resize_with_watchdog(
            Arc::new(SlowDecoder(Duration::from_millis(300))),
            vec![1],
            "image/png".into(),
            ResizeOpts::default(),
            Duration::from_millis(20),
        )
        .await;
        assert_eq!(out.unwrap_err(), UploadError::NotImage);
    }

    #[tokio::test]
    async fn decode_failure_maps_to_not_image() {
        let out = resize_with_watchdog(
            Arc::new(FailingDecoder),
            vec![1],
            "image/png".into(),
            ResizeOpts::default(),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(out.unwrap_err(), UploadError::NotImage);
    }

    #[tokio::test]
    async fn deadline_does_not_cover_the_resample() {
        // Resample takes far longer than the deadline; only the decode races
        // the watchdog, so the operation still succeeds.
        let out = resize_with_watchdog(
            Arc::new(SlowSampler(Duration::from_millis(300))),
            vec![1],
            "image/png".into(),
            ResizeOpts::default(),
            Duration::from_millis(20),
        )
        .await
        .unwrap();
        match out {
            ResizeOutput::Resized { bytes, .. } => assert_eq!(bytes, vec![9, 9]),
            other => panic!("expected Resized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fast_resize_passes_through() {
        let out = resize_with_watchdog(
            Arc::new(SlowSampler(Duration::ZERO)),
            vec![9, 9],
            "image/png".into(),
            ResizeOpts::default(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert!(matches!(out, ResizeOutput::Resized { .. }));
    }
}
