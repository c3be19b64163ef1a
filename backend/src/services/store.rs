use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::fs;
use tracing::{debug, info};

use crate::models::error::AppError;
use crate::services::encoding::content_hash;

/// String key/value persistence behind the session and history stores.
/// Values are JSON documents.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: String) -> Result<(), AppError>;
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under `dir`; file names are the SHA-256 of the key so
/// session tokens never reach the filesystem.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub async fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!(dir = %dir.display(), "File store ready");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", content_hash(key.as_bytes())))
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Internal(format!("Failed to read store entry: {}", e))),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        let path = self.path_for(key);
        let tmp = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&tmp, value.as_bytes()).await.map_err(|e| {
            AppError::Internal(format!("Failed to write store entry: {}", e))
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            AppError::Internal(format!("Failed to commit store entry: {}", e))
        })?;
        debug!(path = %path.display(), "Store entry written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!("Failed to remove store entry: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(store: &dyn KvStore) {
        assert_eq!(store.get("a").await.unwrap(), None);
        store.set("a", "{\"x\":1}".to_string()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("{\"x\":1}"));
        store.set("a", "{\"x\":2}".to_string()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("{\"x\":2}"));
        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        exercise(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("kv")).await.unwrap();
        exercise(&store).await;
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::new(dir.path()).await.unwrap();
            store.set("session:abc", "\"kept\"".to_string()).await.unwrap();
        }
        let reopened = FileStore::new(dir.path()).await.unwrap();
        assert_eq!(reopened.get("session:abc").await.unwrap().as_deref(), Some("\"kept\""));

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(!names[0].contains("abc"));
    }
}
