//! # Binding Layer
//!
//! Where trigger events enter the pipeline. An [`UploadBinding`] stands in
//! for one bound target — a file picker or a drop zone — and accepts its
//! events: a selection carries the chosen files, a drop carries whatever
//! payload landed. Only the first file of a multi-file event is taken
//! (warned), non-file drops are rejected with a warning and never reach the
//! network, and a per-binding mutex serializes overlapping triggers so at
//! most one attempt is in flight per binding.
//!
//! Settings are cloned per attempt; nothing mutable survives between
//! triggers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::file::SelectedFile;
use crate::pipeline::Uploader;
use crate::settings::UploadSettings;

/// What landed on a drop target.
#[derive(Debug)]
pub enum DropPayload {
    Files(Vec<SelectedFile>),
    /// Dragged text or markup; not a file.
    Text(String),
    /// A virtual entry with no file content (e.g. a device or folder icon).
    VirtualEntry,
}

/// One event on a bound target.
#[derive(Debug)]
pub enum Trigger {
    /// File-picker selection.
    Selection(Vec<SelectedFile>),
    /// Drop onto the target.
    Drop(DropPayload),
}

/// A pipeline bound to one upload target.
pub struct UploadBinding {
    uploader: Arc<Uploader>,
    settings: UploadSettings,
    gate: Mutex<()>,
}

impl UploadBinding {
    /// Binds settings to a pipeline. Returns `None` — and binds nothing —
    /// when the environment cannot upload binary data at all.
    pub fn bind(uploader: Arc<Uploader>, settings: UploadSettings) -> Option<Self> {
        if !uploader.capabilities().can_upload_binary {
            tracing::error!("skipping bind: binary upload is not supported");
            return None;
        }
        Some(Self {
            uploader,
            settings,
            gate: Mutex::new(()),
        })
    }

    /// Processes one trigger. Overlapping triggers on the same binding wait
    /// their turn.
    pub async fn trigger(
        &self,
        trigger: Trigger,
    ) -> Result<Option<reqwest::Response>, reqwest::Error> {
        let _in_flight = self.gate.lock().await;
        let Some(file) = first_file(trigger) else {
            return Ok(None);
        };
        let settings = self.settings.clone();
        self.uploader.upload(file, &settings).await
    }
}

/// First-file rule shared by selections and drops.
fn first_file(trigger: Trigger) -> Option<SelectedFile> {
    let mut files = match trigger {
        Trigger::Selection(files) => {
            if files.is_empty() {
                tracing::error!("no file selected");
                return None;
            }
            files
        }
        Trigger::Drop(DropPayload::Files(files)) => {
            if files.is_empty() {
                tracing::error!("dropped entry has no file content");
                return None;
            }
            files
        }
        Trigger::Drop(DropPayload::Text(_)) => {
            tracing::error!("drop payload is not a file; ignoring");
            return None;
        }
        Trigger::Drop(DropPayload::VirtualEntry) => {
            tracing::error!("dropped a virtual entry; ignoring");
            return None;
        }
    };
    if files.len() > 1 {
        tracing::warn!(
            count = files.len(),
            "multiple files not implemented; only the first will be uploaded"
        );
    }
    Some(files.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Capabilities, Features};
    use crate::config::server::ServerConfig;
    use crate::image::image_rs::ImageRsResizer;
    use crate::server::echo;
    use crate::transport::Transport;
    use serde_json::Value;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::Duration;

    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/upload.json";

    fn uploader_with(features: Features) -> Arc<Uploader> {
        Arc::new(Uploader::with_parts(
            Capabilities::detect(&features),
            Arc::new(ImageRsResizer),
            Transport::new(),
        ))
    }

    async fn spawn_echo() -> (String, PathBuf) {
        let mut root = std::env::temp_dir();
        root.push(format!("filedrop-e2e-{}", uuid::Uuid::new_v4()));
        let config = ServerConfig {
            upload_root: root.clone(),
            max_body_bytes: 32 * 1024 * 1024,
        };
        let app = echo::router_from_config(&config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/upload.json"), root)
    }

    fn make_png(w: u32, h: u32) -> Vec<u8> {
        let img = image::ImageBuffer::from_pixel(w, h, image::Rgba([10u8, 20, 30, 255]));
        let mut cur = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut cur,
            img.as_raw(),
            w,
            h,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .expect("encode png");
        cur.into_inner()
    }

    #[tokio::test]
    async fn selection_round_trips_through_the_echo_server() {
        let (endpoint, root) = spawn_echo().await;
        let binding = UploadBinding::bind(
            uploader_with(Features::default()),
            UploadSettings::new(endpoint.clone()),
        )
        .unwrap();

        let file = SelectedFile::from_bytes("hello.txt", "text/plain", b"world".to_vec());
        let res = binding
            .trigger(Trigger::Selection(vec![file]))
            .await
            .unwrap()
            .expect("a dispatched request");
        let json: Value = res.json().await.unwrap();
        assert_eq!(json["name"], "hello.txt");
        assert_eq!(json["type"], "text/plain");
        assert_eq!(json["size"], 5);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn oversized_image_is_resized_before_upload() {
        let (endpoint, root) = spawn_echo().await;
        let settings = UploadSettings::new(endpoint.clone())
            .with_image_bounds(Some(800), Some(800))
            .with_decode_timeout(Duration::from_secs(30));
        let binding = UploadBinding::bind(uploader_with(Features::default()), settings).unwrap();

        let file = SelectedFile::from_bytes("big.png", "image/png", make_png(2000, 1000));
        let res = binding
            .trigger(Trigger::Selection(vec![file]))
            .await
            .unwrap()
            .expect("a dispatched request");
        let json: Value = res.json().await.unwrap();
        assert_eq!(json["width"], 800);
        assert_eq!(json["height"], 400);
        assert_eq!(json["name"], "big.resized.png");
        assert_eq!(json["type"], "image/png");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn in_bounds_image_bypasses_recompression() {
        let (endpoint, root) = spawn_echo().await;
        let png = make_png(100, 50);
        let settings = UploadSettings::new(endpoint.clone())
            .with_image_bounds(Some(500), Some(500))
            .with_decode_timeout(Duration::from_secs(30));
        let binding = UploadBinding::bind(uploader_with(Features::default()), settings).unwrap();

        let file = SelectedFile::from_bytes("small.png", "image/png", png.clone());
        let res = binding
            .trigger(Trigger::Selection(vec![file]))
            .await
            .unwrap()
            .expect("a dispatched request");
        let json: Value = res.json().await.unwrap();
        // The original bytes went out untouched.
        assert_eq!(json["size"], png.len() as u64);
        assert_eq!(json["name"], "small.png");
        assert_eq!(json["width"], 100);
        assert_eq!(json["height"], 50);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn hand_assembled_body_is_accepted_by_the_server() {
        let (endpoint, root) = spawn_echo().await;
        let binding = UploadBinding::bind(
            uploader_with(Features {
                structured_multipart: false,
                ..Features::default()
            }),
            UploadSettings::new(endpoint.clone()),
        )
        .unwrap();

        let file = SelectedFile::from_bytes("raw.txt", "text/plain", b"payload".to_vec());
        let res = binding
            .trigger(Trigger::Selection(vec![file]))
            .await
            .unwrap()
            .expect("a dispatched request");
        let json: Value = res.json().await.unwrap();
        assert_eq!(json["name"], "raw.txt");
        assert_eq!(json["size"], 7);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn multi_file_selection_takes_the_first() {
        let (endpoint, root) = spawn_echo().await;
        let binding = UploadBinding::bind(
            uploader_with(Features::default()),
            UploadSettings::new(endpoint.clone()),
        )
        .unwrap();

        let files = vec![
            SelectedFile::from_bytes("first.txt", "text/plain", b"1".to_vec()),
            SelectedFile::from_bytes("second.txt", "text/plain", b"22".to_vec()),
        ];
        let res = binding
            .trigger(Trigger::Selection(files))
            .await
            .unwrap()
            .expect("a dispatched request");
        let json: Value = res.json().await.unwrap();
        assert_eq!(json["name"], "first.txt");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn non_file_drops_never_reach_the_network() {
        let binding = UploadBinding::bind(
            uploader_with(Features::default()),
            UploadSettings::new(DEAD_ENDPOINT),
        )
        .unwrap();

        let text = binding
            .trigger(Trigger::Drop(DropPayload::Text("dragged words".into())))
            .await
            .unwrap();
        assert!(text.is_none());

        let virt = binding
            .trigger(Trigger::Drop(DropPayload::VirtualEntry))
            .await
            .unwrap();
        assert!(virt.is_none());

        let empty = binding
            .trigger(Trigger::Drop(DropPayload::Files(vec![])))
            .await
            .unwrap();
        assert!(empty.is_none());
    }

    #[tokio::test]
    async fn empty_selection_is_ignored() {
        let binding = UploadBinding::bind(
            uploader_with(Features::default()),
            UploadSettings::new(DEAD_ENDPOINT),
        )
        .unwrap();
        let out = binding.trigger(Trigger::Selection(vec![])).await.unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn unsupported_environment_refuses_to_bind() {
        let binding = UploadBinding::bind(
            uploader_with(Features {
                structured_multipart: false,
                binary_send: false,
                ..Features::default()
            }),
            UploadSettings::new(DEAD_ENDPOINT),
        );
        assert!(binding.is_none());
    }
}
