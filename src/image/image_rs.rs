//! # Image Resizer Implementation (image-rs)
//!
//! [`ImageResizer`] backend built on the [`image`] crate.
//!
//! Scaling rule: `ratio = max(w / max_w, h / max_h, 1)` with unset bounds
//! treated as infinite, then `floor(max(dim / ratio, 1))` per axis. The
//! result never exceeds the requested box and is never upscaled; the binding
//! dimension lands exactly on its bound. When the computed dimensions equal
//! the source and `force` is unset, the operation reports
//! [`ResizeOutput::Unchanged`] so the caller can forward the original bytes
//! without recompression.
//!
//! # Example
//! ```rust,no_run
//! use filedrop::image::image_rs::ImageRsResizer;
//! use filedrop::image::processor::{ImageResizer, ResizeOpts};
//!
//! let resizer = ImageRsResizer::default();
//! let bytes = std::fs::read("input.png").unwrap();
//! let opts = ResizeOpts {
//!     max_width: Some(800),
//!     max_height: Some(800),
//!     ..Default::default()
//! };
//! let out = resizer.resize(&bytes, "image/png", &opts).unwrap();
//! ```

use std::io::Cursor;

use anyhow::{Context, Result};
use image::{imageops::FilterType, ColorType, DynamicImage, GenericImageView, ImageReader};

use super::processor::{ImageKind, ImageResizer, ResizeOpts, ResizeOutput};

/// A concrete [`ImageResizer`] using the `image` crate.
#[derive(Clone, Debug, Default)]
pub struct ImageRsResizer;

impl ImageResizer for ImageRsResizer {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .context("guess format")?
            .decode()
            .context("decode image")
    }

    fn process(
        &self,
        img: DynamicImage,
        source_type: &str,
        opts: &ResizeOpts,
    ) -> Result<ResizeOutput> {
        let (w, h) = img.dimensions();
        let (tw, th) = fit_dimensions(w, h, opts.max_width, opts.max_height);
        tracing::debug!(
            source = format!("{w}x{h}"),
            target = format!("{tw}x{th}"),
            "computed resize dimensions"
        );

        if !opts.force && tw == w && th == h {
            return Ok(ResizeOutput::Unchanged);
        }

        let resized = img.resize_exact(tw, th, FilterType::Triangle);
        let kind = opts.image_type.pick(source_type);
        let bytes = encode(&resized, kind)?;
        Ok(ResizeOutput::Resized {
            bytes,
            kind,
            width: tw,
            height: th,
        })
    }
}

/// Target dimensions that fit the box, preserve aspect ratio, and never
/// upscale. Unset bounds are infinite.
fn fit_dimensions(w: u32, h: u32, max_w: Option<u32>, max_h: Option<u32>) -> (u32, u32) {
    let bound = |v: Option<u32>| v.map(|b| b as f64).unwrap_or(f64::INFINITY);
    let ratio = (w as f64 / bound(max_w))
        .max(h as f64 / bound(max_h))
        .max(1.0);
    let tw = (w as f64 / ratio).max(1.0).floor() as u32;
    let th = (h as f64 / ratio).max(1.0).floor() as u32;
    (tw, th)
}

fn encode(img: &DynamicImage, kind: ImageKind) -> Result<Vec<u8>> {
    let (w, h) = img.dimensions();
    let mut out = Vec::new();
    let mut cur = Cursor::new(&mut out);
    match kind {
        ImageKind::Jpeg => {
            let rgb = img.to_rgb8();
            image::write_buffer_with_format(&mut cur, &rgb, w, h, ColorType::Rgb8, kind.format())?;
        }
        ImageKind::Png => {
            let rgba = img.to_rgba8();
            image::write_buffer_with_format(
                &mut cur,
                &rgba,
                w,
                h,
                ColorType::Rgba8,
                kind.format(),
            )?;
        }
    }
    Ok(out)
}
