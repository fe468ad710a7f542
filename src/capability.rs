//! # Capability Detection
//!
//! One probe of the available transport and image primitives, evaluated
//! once, producing two read-only flags and a closed body-strategy choice.
//! The flags are injected into the pipeline rather than consulted ad hoc,
//! and a process-wide copy is cached behind a `OnceLock`.
//!
//! [`Features`] defaults to everything available; individual primitives can
//! be switched off to exercise the degraded strategies in tests or to force
//! the hand-assembled body path.
//!
//! # Example
//! ```
//! use filedrop::capability::{BodyStrategy, Capabilities, Features};
//!
//! let caps = Capabilities::detect(&Features::default());
//! assert!(caps.can_upload_binary);
//! assert!(caps.can_resize_images);
//! assert_eq!(caps.body, BodyStrategy::Structured);
//! ```

use std::sync::OnceLock;

/// Which primitives the environment offers. Probe input only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Features {
    /// A structured multipart body API.
    pub structured_multipart: bool,
    /// A binary-safe send primitive (byte-for-byte string bodies).
    pub binary_send: bool,
    /// Offscreen rasterization of a decoded image.
    pub rasterize: bool,
    /// Direct extraction of an in-memory file object from raster output.
    pub in_memory_file: bool,
    /// Decoding a data URL back into bytes.
    pub data_url_decode: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            structured_multipart: true,
            binary_send: true,
            rasterize: true,
            in_memory_file: true,
            data_url_decode: true,
        }
    }
}

/// How the request body gets built. Selected once from the probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyStrategy {
    /// Structured multipart container, file attached under the fixed field.
    Structured,
    /// Hand-assembled multipart byte body with a random boundary.
    HandAssembled,
    /// No viable transport; attempts end silently at the build stage.
    Unsupported,
}

/// The two exposed flags plus everything the pipeline needs to pick paths.
/// Read-only after detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Binary upload is possible at all.
    pub can_upload_binary: bool,
    /// Client-side image resizing is possible.
    pub can_resize_images: bool,
    pub body: BodyStrategy,
    pub structured_multipart: bool,
    pub binary_send: bool,
    pub in_memory_file: bool,
}

impl Capabilities {
    /// Pure function of the probe. No side effects beyond diagnostics.
    pub fn detect(features: &Features) -> Self {
        let can_upload_binary = features.structured_multipart || features.binary_send;
        let can_resize_images = features.rasterize
            && (features.in_memory_file
                || (features.binary_send && features.data_url_decode));

        let body = if features.structured_multipart {
            BodyStrategy::Structured
        } else if features.binary_send {
            BodyStrategy::HandAssembled
        } else {
            BodyStrategy::Unsupported
        };

        if can_upload_binary {
            tracing::info!(strategy = ?body, "binary upload is supported");
        } else {
            tracing::info!("binary upload is not supported in this configuration");
        }
        if can_resize_images {
            tracing::info!("image resizing and uploading is supported");
        } else {
            tracing::info!("uploading resized images is not supported in this configuration");
        }

        Self {
            can_upload_binary,
            can_resize_images,
            body,
            structured_multipart: features.structured_multipart,
            binary_send: features.binary_send,
            in_memory_file: features.in_memory_file,
        }
    }

    /// Process-wide flags, probed from [`Features::default`] on first use.
    pub fn global() -> Capabilities {
        static GLOBAL: OnceLock<Capabilities> = OnceLock::new();
        *GLOBAL.get_or_init(|| Capabilities::detect(&Features::default()))
    }
}
