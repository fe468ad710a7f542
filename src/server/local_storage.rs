//! # Local File Storage
//!
//! [`FileStorage`] backend writing under a configured root directory.
//! Creates parent directories, trims leading slashes, and neuters `..`
//! segments so a hostile key cannot escape the root.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::storage::{FileStorage, StoredFile};

/// Stores received uploads on the local filesystem.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn save_file(&self, rel_path: &str, bytes: &[u8]) -> Result<StoredFile> {
        let safe = rel_path.trim_start_matches('/').replace("..", "_");
        let full = self.root.join(&safe);
        if let Some(dir) = full.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&full, bytes).with_context(|| format!("write {:?}", &full))?;
        Ok(StoredFile::new(
            full.to_string_lossy().into_owned(),
            bytes.len() as u64,
        ))
    }
}

impl FileStorage for LocalFileStorage {
    fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<StoredFile> {
        self.save_file(rel_path, bytes)
    }
}
