//! # Selected Files and Derived Metadata
//!
//! [`SelectedFile`] is the opaque handle the binding layer hands to the
//! pipeline: either a path on disk or an in-memory buffer (drop payloads,
//! resized output, tests). It is read-only once constructed.
//!
//! [`FileInfo`] is the per-attempt metadata derived from it: name, MIME
//! type, byte size, and — when the name contains non-ASCII characters — a
//! transfer-name variant whose UTF-8 bytes pass through the multipart header
//! verbatim.

use std::path::{Path, PathBuf};

use crate::error::UploadError;
use crate::image::processor::ImageKind;

/// An opaque handle to a user-chosen file. Never mutated after creation.
#[derive(Clone, Debug)]
pub enum SelectedFile {
    /// A file on disk; metadata is read lazily.
    Disk(PathBuf),
    /// A named buffer already in memory.
    Memory {
        name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        SelectedFile::Disk(path.into())
    }

    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        SelectedFile::Memory {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// The filename as it will appear in the multipart header.
    pub fn name(&self) -> String {
        match self {
            SelectedFile::Disk(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            SelectedFile::Memory { name, .. } => name.clone(),
        }
    }

    /// Best-effort metadata without touching the filesystem.
    ///
    /// Disk sizes come back as zero; used only to give the error callback
    /// something to report when the real metadata read itself fails.
    pub fn describe(&self) -> FileInfo {
        match self {
            SelectedFile::Disk(_) => {
                let name = self.name();
                let content_type = guess_content_type(&name).to_string();
                FileInfo::new(name, content_type, 0)
            }
            SelectedFile::Memory {
                name,
                content_type,
                bytes,
            } => FileInfo::new(name.clone(), content_type.clone(), bytes.len() as u64),
        }
    }

    /// Full metadata for this file. Suspends on the disk metadata read.
    pub async fn info(&self) -> Result<FileInfo, UploadError> {
        match self {
            SelectedFile::Disk(path) => {
                let meta = tokio::fs::metadata(path)
                    .await
                    .map_err(|e| UploadError::from_io(&e))?;
                let name = self.name();
                let content_type = guess_content_type(&name).to_string();
                Ok(FileInfo::new(name, content_type, meta.len()))
            }
            SelectedFile::Memory { .. } => Ok(self.describe()),
        }
    }

    /// Reads the whole file into memory. Suspends on the disk read.
    pub async fn read(&self) -> Result<Vec<u8>, UploadError> {
        match self {
            SelectedFile::Disk(path) => tokio::fs::read(path)
                .await
                .map_err(|e| UploadError::from_io(&e)),
            SelectedFile::Memory { bytes, .. } => Ok(bytes.clone()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SelectedFile::Disk(path) => Some(path),
            SelectedFile::Memory { .. } => None,
        }
    }
}

/// Metadata for one upload attempt. Created per attempt, replaced by the
/// resizer when it re-encodes, discarded once the request is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    /// Original filename as supplied.
    pub name: String,
    /// MIME type, possibly empty when the source did not provide one.
    pub content_type: String,
    /// Byte size.
    pub size: u64,
    /// Set when `name` contains non-ASCII characters; the same string, kept
    /// separate to record that its UTF-8 bytes go on the wire unescaped.
    pub transfer_name: Option<String>,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let transfer_name = if name.is_ascii() {
            None
        } else {
            tracing::debug!(file = %name, "filename contains non-ASCII characters; UTF-8 bytes pass through the header verbatim");
            Some(name.clone())
        };
        Self {
            name,
            content_type: content_type.into(),
            size,
            transfer_name,
        }
    }

    /// The name to write into the `Content-Disposition` header.
    pub fn wire_name(&self) -> &str {
        self.transfer_name.as_deref().unwrap_or(&self.name)
    }

    /// Everything after the last dot, or the whole name when there is none.
    pub fn extension(&self) -> &str {
        match self.name.rfind('.') {
            Some(i) => &self.name[i + 1..],
            None => &self.name,
        }
    }

    /// Metadata for the re-encoded output of a resize: the stem up to the
    /// first dot plus a `.resized.` marker, the new type, the new size.
    pub fn resized(&self, kind: ImageKind, size: u64) -> FileInfo {
        let stem = match self.name.find('.') {
            Some(i) => &self.name[..i],
            None => self.name.as_str(),
        };
        FileInfo::new(
            format!("{stem}.resized.{}", kind.extension()),
            kind.mime(),
            size,
        )
    }
}

/// Extension-based MIME guess for disk files, which carry no declared type.
fn guess_content_type(name: &str) -> &'static str {
    let ext = match name.rfind('.') {
        Some(i) => &name[i + 1..],
        None => "",
    };
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
