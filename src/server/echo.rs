//! # Upload Echo Endpoint
//!
//! The companion server: accepts `POST /upload.json` with a multipart body,
//! requires the fixed `Filedata` field, writes the received bytes to a temp
//! key through the storage seam, and echoes metadata about what arrived —
//! name, type, size, temp path, and the decoded image dimensions when the
//! payload is an image.
//!
//! Anything else gets `{"error": <message>}`: wrong method, missing field,
//! or a field that failed to read. All responses are JSON.
//!
//! ## Example
//! ```rust,ignore
//! use filedrop::config::server::ServerConfig;
//! use filedrop::server::echo;
//!
//! let app = echo::router_from_config(&ServerConfig::from_env());
//! // axum::serve(listener, app).await
//! ```

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::extract::Multipart;
use chrono::Utc;
use image::GenericImageView;
use serde::Serialize;
use uuid::Uuid;

use super::local_storage::LocalFileStorage;
use super::storage::FileStorage;
use crate::config::server::ServerConfig;
use crate::request::FIELD_NAME;

/// Metadata echoed back for a received upload.
#[derive(Serialize)]
pub struct UploadEcho {
    /// Original filename from the multipart header.
    pub name: String,
    /// Content type declared for the field.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Received byte count.
    pub size: u64,
    /// Where the bytes were written.
    pub tmp_name: String,
    /// Decoded pixel dimensions, present only for decodable images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Serialize)]
pub struct UploadFault {
    pub error: String,
}

/// Handles one multipart upload; the first `Filedata` field wins.
pub async fn echo_handler(
    Extension(storage): Extension<Arc<dyn FileStorage>>,
    mut multipart: Multipart,
) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some(FIELD_NAME) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_default();
        let name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.bin".into());

        let data = match field.bytes().await {
            Ok(b) => b,
            Err(e) => {
                return Json(UploadFault {
                    error: format!("Filedata field found but with error: {e}."),
                })
                .into_response();
            }
        };

        let stored = match storage.save(&temp_key(&name), &data) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(error = %e, "failed to store received upload");
                return Json(UploadFault {
                    error: format!("save error: {e}"),
                })
                .into_response();
            }
        };

        let dims = image::load_from_memory(&data).ok().map(|img| img.dimensions());
        return Json(UploadEcho {
            name,
            content_type,
            size: stored.bytes,
            tmp_name: stored.path,
            width: dims.map(|d| d.0),
            height: dims.map(|d| d.1),
        })
        .into_response();
    }

    Json(UploadFault {
        error: "Filedata field not found.".into(),
    })
    .into_response()
}

async fn method_only() -> Json<UploadFault> {
    Json(UploadFault {
        error: "POST request method only.".into(),
    })
}

/// Router for the echo endpoint with a request-body cap.
pub fn router(storage: Arc<dyn FileStorage>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/upload.json", post(echo_handler).fallback(method_only))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(Extension(storage))
}

/// Router wired from [`ServerConfig`]: local-filesystem storage under the
/// configured upload root, body cap from the configured limit. The server
/// entry point.
pub fn router_from_config(config: &ServerConfig) -> Router {
    let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(&config.upload_root));
    router(storage, config.max_body_bytes)
}

/// Date-partitioned temp key with a fresh id and a sanitized extension.
fn temp_key(name: &str) -> String {
    let ext: String = name
        .rfind('.')
        .map(|i| &name[i + 1..])
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_ascii_lowercase();
    let ext = if ext.is_empty() { "bin".to_string() } else { ext };
    format!("tmp/{}/{}.{}", Utc::now().format("%Y%m"), Uuid::new_v4(), ext)
}
