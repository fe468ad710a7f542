//! # File Storage Abstractions
//!
//! The seam the echo endpoint writes received bytes through:
//! - [`StoredFile`] — where one upload landed and how big it was.
//! - [`FileStorage`] — trait over storage backends, so tests can run
//!   against an in-memory stub and deployments against the local
//!   filesystem.

use anyhow::Result;

/// Where a received upload was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// Backend path or identifier of the stored bytes.
    pub path: String,
    /// Byte count written.
    pub bytes: u64,
}

impl StoredFile {
    pub fn new(path: impl Into<String>, bytes: u64) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }
}

/// A generic storage backend for received uploads.
pub trait FileStorage: Send + Sync {
    /// Saves bytes under a relative key (e.g. `"tmp/202608/<id>.png"`) and
    /// returns where they landed and how many were written.
    fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<StoredFile>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockStorage {
        calls: Mutex<Vec<(String, usize)>>,
        fail: bool,
    }

    impl FileStorage for MockStorage {
        fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<StoredFile> {
            if self.fail {
                bail!("backend unavailable");
            }
            self.calls
                .lock()
                .unwrap()
                .push((rel_path.to_string(), bytes.len()));
            Ok(StoredFile::new(
                format!("/abs/{rel_path}"),
                bytes.len() as u64,
            ))
        }
    }

    #[test]
    fn stored_file_holds_values() {
        let s = StoredFile::new("tmp/a.png", 3);
        assert_eq!(s.path, "tmp/a.png");
        assert_eq!(s.bytes, 3);
        assert_eq!(s, s.clone());
    }

    #[test]
    fn save_records_and_returns_stored_file() {
        let storage = Arc::new(MockStorage::default());
        let stored = storage.save("tmp/x.bin", b"abc").unwrap();
        assert_eq!(stored.path, "/abs/tmp/x.bin");
        assert_eq!(stored.bytes, 3);

        let calls = storage.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("tmp/x.bin".to_string(), 3)]);
    }

    #[test]
    fn save_errors_propagate() {
        let storage = MockStorage {
            fail: true,
            ..Default::default()
        };
        assert!(storage.save("tmp/x", b"x").is_err());
    }

    fn assert_send_sync<T: ?Sized + Send + Sync>() {}
    #[test]
    fn dyn_storage_is_send_sync() {
        assert_send_sync::<dyn FileStorage>();
    }
}
