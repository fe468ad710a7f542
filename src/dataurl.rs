//! # Data URLs
//!
//! Encoding file bytes as `data:<mime>;base64,<payload>` and back. The
//! resize path reads the file this way so the resizer's input matches what
//! it would receive from a raster source.
//!
//! # Example
//! ```
//! use filedrop::dataurl;
//!
//! let url = dataurl::encode("image/png", b"abc");
//! assert!(url.starts_with("data:image/png;base64,"));
//!
//! let (mime, bytes) = dataurl::decode(&url).unwrap();
//! assert_eq!(mime, "image/png");
//! assert_eq!(bytes, b"abc");
//! ```

use anyhow::{Context, Result, bail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Encodes bytes as a base64 data URL. An empty MIME type becomes the
/// octet-stream placeholder.
pub fn encode(content_type: &str, bytes: &[u8]) -> String {
    let ct = if content_type.is_empty() {
        "application/octet-stream"
    } else {
        content_type
    };
    format!("data:{ct};base64,{}", STANDARD.encode(bytes))
}

/// Splits a base64 data URL into its MIME type and decoded bytes.
pub fn decode(data_url: &str) -> Result<(String, Vec<u8>)> {
    let rest = match data_url.strip_prefix("data:") {
        Some(r) => r,
        None => bail!("missing data: prefix"),
    };
    let (meta, payload) = rest.split_once(',').context("missing payload separator")?;
    let mime = match meta.strip_suffix(";base64") {
        Some(m) => m,
        None => bail!("only base64 data URLs are supported"),
    };
    let bytes = STANDARD.decode(payload).context("invalid base64 payload")?;
    Ok((mime.to_string(), bytes))
}
