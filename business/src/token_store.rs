//! Persistence for the registration token.
//!
//! The token lives in a small JSON file under the key `api_token`, the
//! same shape other tooling around the API expects. Tests and embedders
//! that do not want disk writes use [`MemoryTokenStore`].

use std::fmt::Debug;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

pub trait TokenStore: Send + Sync + Debug {
    /// Currently persisted token, if any.
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    api_token: Option<String>,
}

/// File-backed store. The file and its parent directories are created on
/// first write.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_file(&self) -> Option<TokenFile> {
        let bytes = std::fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn write_file(&self, file: &TokenFile) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(file).map_err(io::Error::other)?;
        std::fs::write(&self.path, bytes)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        self.read_file()?.api_token
    }

    fn store(&self, token: &str) -> io::Result<()> {
        self.write_file(&TokenFile {
            api_token: Some(token.to_owned()),
        })
    }

    fn clear(&self) -> io::Result<()> {
        self.write_file(&TokenFile::default())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| (*guard).clone())
    }

    fn store(&self, token: &str) -> io::Result<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_owned());
        }
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("auth").join("token.json");

        let store = FileTokenStore::new(&path);
        assert_eq!(store.load(), None);

        store.store("tok-123").expect("store");
        assert_eq!(store.load(), Some("tok-123".to_owned()));

        // A second instance sees the persisted value.
        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.load(), Some("tok-123".to_owned()));

        store.clear().expect("clear");
        assert_eq!(reopened.load(), None);
    }

    #[test]
    fn file_store_uses_the_api_token_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("token.json");

        FileTokenStore::new(&path).store("abc").expect("store");
        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"api_token\""));
        assert!(raw.contains("\"abc\""));
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("token.json");
        std::fs::write(&path, b"{ not json").expect("write");

        assert_eq!(FileTokenStore::new(&path).load(), None);
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryTokenStore::with_token("seed");
        assert_eq!(store.load(), Some("seed".to_owned()));
        store.store("next").expect("store");
        assert_eq!(store.load(), Some("next".to_owned()));
        store.clear().expect("clear");
        assert_eq!(store.load(), None);
    }
}
