//! # filedrop
//!
//! An async file-upload pipeline: validate a selected or dropped file,
//! optionally resize it when it is an image, package it as a
//! `multipart/form-data` body — structured or hand-assembled — and POST it.
//! A companion [`server`] module provides the echo endpoint the pipeline
//! talks to.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use filedrop::binding::{Trigger, UploadBinding};
//! use filedrop::file::SelectedFile;
//! use filedrop::pipeline::Uploader;
//! use filedrop::settings::UploadSettings;
//!
//! # async fn run() -> Result<(), reqwest::Error> {
//! let settings = UploadSettings::new("http://localhost:3000/upload.json")
//!     .with_image_bounds(Some(800), Some(800));
//! let binding = UploadBinding::bind(Arc::new(Uploader::new()), settings).unwrap();
//!
//! let file = SelectedFile::from_path("photo.jpg");
//! binding.trigger(Trigger::Selection(vec![file])).await?;
//! # Ok(())
//! # }
//! ```

// ===============================
// Re-exports of external crates
// ===============================

pub use anyhow;
pub use axum;
pub use axum_extra;
pub use base64;
pub use chrono;
pub use regex;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;
pub use uuid;

// ===============================
// Public modules
// ===============================
pub mod binding;
pub mod capability;
pub mod config;
pub mod dataurl;
pub mod error;
pub mod file;
pub mod image;
pub mod pipeline;
pub mod reader;
pub mod request;
pub mod server;
pub mod settings;
pub mod transport;
