//! File-based store: one file per entry under a directory.
//!
//! File layout: a single JSON header line (`{"key":..,"expires_at_ms":..}`)
//! followed by the raw value bytes. File names are the SHA-256 of the key,
//! so arbitrary keys map to safe names; the header keeps the original key for
//! pattern enumeration.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::matching::KeyMatcher;
use crate::traits::CacheStore;

const ENTRY_SUFFIX: &str = "cache";

#[derive(Debug, Serialize, Deserialize)]
struct EntryHeader {
    key: String,
    expires_at_ms: u64,
}

impl EntryHeader {
    fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

/// Store that keeps each entry in its own file.
///
/// Survives process restarts and can be shared by workers on one host.
/// Writes go to a temporary file first and are renamed into place, so a
/// reader never sees a half-written entry.
pub struct FileStore {
    location: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `location`.
    pub async fn open(location: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let location = location.into();
        fs::create_dir_all(&location).await?;

        debug!(location = %location.display(), "File cache store opened");

        Ok(Self {
            location,
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// Directory holding the entries.
    pub fn location(&self) -> &Path {
        &self.location
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.location
            .join(format!("{}.{}", hex::encode(digest), ENTRY_SUFFIX))
    }

    fn tmp_path(&self, final_path: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        final_path.with_extension(format!("tmp-{}-{}", std::process::id(), n))
    }

    /// Reads only the header line of an entry file.
    async fn read_header(path: &Path) -> Result<EntryHeader, StoreError> {
        let file = fs::File::open(path).await?;
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        reader.read_line(&mut line).await?;

        serde_json::from_str(line.trim_end())
            .map_err(|e| StoreError::corrupt(path.display().to_string(), e.to_string()))
    }

    /// Lists every entry file in the store directory.
    async fn entry_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut files = Vec::new();
        let mut dir = fs::read_dir(&self.location).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(ENTRY_SUFFIX) {
                files.push(path);
            }
        }

        Ok(files)
    }

    async fn remove_quietly(path: &Path) -> Result<bool, StoreError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(millis)
        .unwrap_or(0)
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn split_entry(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let newline = bytes.iter().position(|b| *b == b'\n')?;
    Some((&bytes[..newline], &bytes[newline + 1..]))
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.entry_path(key);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let (header_bytes, value) = split_entry(&bytes)
            .ok_or_else(|| StoreError::corrupt(key, "missing entry header"))?;
        let header: EntryHeader = serde_json::from_slice(header_bytes)
            .map_err(|e| StoreError::corrupt(key, e.to_string()))?;

        if header.key != key {
            // Colision de hash o archivo ajeno
            return Ok(None);
        }

        if header.is_expired(now_ms()) {
            Self::remove_quietly(&path).await?;
            return Ok(None);
        }

        Ok(Some(value.to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        let header = EntryHeader {
            key: key.to_string(),
            expires_at_ms: now_ms().saturating_add(millis(ttl)),
        };

        let mut contents = serde_json::to_vec(&header)
            .map_err(|e| StoreError::corrupt(key, e.to_string()))?;
        contents.push(b'\n');
        contents.extend_from_slice(&value);

        let final_path = self.entry_path(key);
        let tmp_path = self.tmp_path(&final_path);

        fs::write(&tmp_path, &contents).await?;
        if let Err(e) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let matcher = KeyMatcher::new(pattern)?;
        let now = now_ms();
        let mut keys = Vec::new();

        for path in self.entry_files().await? {
            match Self::read_header(&path).await {
                Ok(header) if !header.is_expired(now) && matcher.matches(&header.key) => {
                    keys.push(header.key);
                },
                Ok(_) => {},
                // Otro worker pudo borrar el archivo entre read_dir y open
                Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {},
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable cache file");
                },
            }
        }

        Ok(keys)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, StoreError> {
        let mut deleted = 0;
        for key in keys {
            if Self::remove_quietly(&self.entry_path(key)).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        for path in self.entry_files().await? {
            Self::remove_quietly(&path).await?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "files"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let metadata = fs::metadata(&self.location).await?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(StoreError::unavailable(
                "files",
                format!("{} is not a directory", self.location.display()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (FileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("cache")).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let (store, _dir) = store().await;
        assert!(store.location().is_dir());
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_set_and_get_round_trip() {
        let (store, _dir) = store().await;
        let value = b"{\"id\":5,\"name\":\"Ana\"}\n{\"multi\":\"line\"}".to_vec();

        store
            .set("USER-/api/v1/users:5:", value.clone(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.get("USER-/api/v1/users:5:").await.unwrap(), Some(value));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let (store, _dir) = store().await;
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_none_and_removed() {
        let (store, _dir) = store().await;
        store
            .set("k", b"v".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(store.get("k").await.unwrap().is_none());
        assert!(!store.entry_path("k").exists());
    }

    #[tokio::test]
    async fn test_huge_ttl_does_not_wrap_into_expiry() {
        let (store, _dir) = store().await;
        store
            .set("k", b"v".to_vec(), Duration::from_secs(18_446_744_073_709_552))
            .await
            .unwrap();
        store
            .set("max", b"v".to_vec(), Duration::from_secs(i64::MAX as u64))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.get("max").await.unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::from_secs(u64::MAX)), u64::MAX);
    }

    #[tokio::test]
    async fn test_keys_and_delete_many() {
        let (store, _dir) = store().await;
        for key in ["USER-/a:5:", "USER-/a:7:", "PAYMENT-/p:5:"] {
            store.set(key, b"{}".to_vec(), Duration::from_secs(60)).await.unwrap();
        }

        let mut keys = store.keys("USER-*").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["USER-/a:5:", "USER-/a:7:"]);

        assert_eq!(store.delete_many(&keys).await.unwrap(), 2);
        assert_eq!(store.delete_many(&keys).await.unwrap(), 0);
        assert_eq!(store.keys("*").await.unwrap(), vec!["PAYMENT-/p:5:"]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let (store, _dir) = store().await;
        std::fs::write(store.entry_path("bad"), b"no header here").unwrap();

        let err = store.get("bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));

        // keys() ignora el archivo corrupto
        assert!(store.keys("*").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_removes_only_entries() {
        let (store, _dir) = store().await;
        std::fs::write(store.location().join("README"), b"keep").unwrap();
        store.set("a", b"1".to_vec(), Duration::from_secs(60)).await.unwrap();
        store.set("b", b"2".to_vec(), Duration::from_secs(60)).await.unwrap();

        store.clear().await.unwrap();

        assert!(store.keys("*").await.unwrap().is_empty());
        assert!(store.location().join("README").exists());
    }
}
