//! # Request Builder
//!
//! Turns exactly one payload source — the untouched file handle or a byte
//! buffer — into the request body. Two shapes exist:
//!
//! - a structured multipart form, file attached under the fixed `Filedata`
//!   field (disk handles are streamed, never buffered);
//! - a hand-assembled `multipart/form-data` byte body with a random
//!   boundary, used when structured bodies are unavailable but a binary-safe
//!   send exists.
//!
//! When neither shape is viable the attempt ends here, logged but otherwise
//! silent.

use rand::Rng as _;
use reqwest::multipart::{Form, Part};
use tokio_util::codec::{BytesCodec, FramedRead};

use crate::capability::Capabilities;
use crate::error::UploadError;
use crate::file::{FileInfo, SelectedFile};

/// Fixed multipart field name the server contract keys on.
pub const FIELD_NAME: &str = "Filedata";

/// Exactly one of these feeds one request.
#[derive(Debug)]
pub enum PayloadSource {
    Handle(SelectedFile),
    Bytes(Vec<u8>),
}

/// A prepared request body, consumed once by the transport.
pub enum RequestPayload {
    /// Structured multipart container; the HTTP client generates the
    /// boundary and content type.
    Structured(Form),
    /// Literal multipart bytes plus the content-type header declaring the
    /// boundary.
    Raw {
        content_type: String,
        body: Vec<u8>,
    },
}

impl std::fmt::Debug for RequestPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestPayload::Structured(_) => f.write_str("RequestPayload::Structured"),
            RequestPayload::Raw { content_type, body } => f
                .debug_struct("RequestPayload::Raw")
                .field("content_type", content_type)
                .field("body_len", &body.len())
                .finish(),
        }
    }
}

/// Builds the body for one attempt. `Ok(None)` means no viable strategy —
/// the documented silent gap, not an error.
pub async fn build(
    caps: &Capabilities,
    source: PayloadSource,
    info: &FileInfo,
) -> Result<Option<RequestPayload>, UploadError> {
    match source {
        PayloadSource::Handle(file) if caps.structured_multipart => {
            let form = structured_form(file, info).await?;
            Ok(Some(RequestPayload::Structured(form)))
        }
        PayloadSource::Bytes(bytes) if caps.binary_send => Ok(Some(raw_multipart(&bytes, info))),
        _ => {
            tracing::error!(
                file = %info.name,
                "no viable request-body strategy; dropping the attempt"
            );
            Ok(None)
        }
    }
}

async fn structured_form(file: SelectedFile, info: &FileInfo) -> Result<Form, UploadError> {
    tracing::info!(file = %info.name, "building a structured multipart body");
    let part = match file {
        SelectedFile::Disk(path) => {
            let handle = tokio::fs::File::open(&path)
                .await
                .map_err(|e| UploadError::from_io(&e))?;
            let stream = FramedRead::new(handle, BytesCodec::new());
            Part::stream_with_length(reqwest::Body::wrap_stream(stream), info.size)
        }
        SelectedFile::Memory { bytes, .. } => Part::bytes(bytes),
    };
    let part = part
        .file_name(info.wire_name().to_string())
        .mime_str(&effective_type(info))
        .map_err(|e| {
            tracing::warn!(error = %e, content_type = %info.content_type, "rejected MIME type");
            UploadError::Io
        })?;
    Ok(Form::new().part(FIELD_NAME, part))
}

/// RFC 1867 layout with CRLF line endings and a random boundary token.
fn raw_multipart(bytes: &[u8], info: &FileInfo) -> RequestPayload {
    tracing::info!(file = %info.name, "assembling a multipart/form-data body by hand");
    let boundary = format!(
        "xhrupload-{}",
        rand::rng().random_range(0..(2u32 << 16))
    );
    let header = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{FIELD_NAME}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        info.wire_name(),
        effective_type(info),
    );
    let footer = format!("\r\n--{boundary}--\r\n");

    let mut body = Vec::with_capacity(header.len() + bytes.len() + footer.len());
    body.extend_from_slice(header.as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(footer.as_bytes());

    RequestPayload::Raw {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        body,
    }
}

/// Placeholder MIME type for sources that declared none.
fn effective_type(info: &FileInfo) -> String {
    if info.content_type.contains('/') {
        info.content_type.clone()
    } else {
        "application/octet-stream".to_string()
    }
}
