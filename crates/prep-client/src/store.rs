//! Device-local key-value storage.
//!
//! Values are JSON documents addressed by the string keys of [`crate::keys`].

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::ClientError;

#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Raw value under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    async fn set(&self, key: &str, value: String) -> Result<(), ClientError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// Read and deserialize the document under `key`.
pub async fn load<T>(store: &dyn LocalStore, key: &str) -> Result<Option<T>, ClientError>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn save<T>(store: &dyn LocalStore, key: &str, value: &T) -> Result<(), ClientError>
where
    T: Serialize + ?Sized,
{
    store.set(key, serde_json::to_string(value)?).await
}

/// Best-effort read: failures are logged and reported as a miss.
pub async fn load_or_miss<T>(store: &dyn LocalStore, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    match load(store, key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable cache entry");
            None
        }
    }
}

/// Best-effort write: failures are logged.
pub async fn save_or_log<T>(store: &dyn LocalStore, key: &str, value: &T)
where
    T: Serialize + ?Sized + Sync,
{
    if let Err(e) = save(store, key, value).await {
        tracing::warn!(key, error = %e, "Failed to write cache entry");
    }
}

/// Process-local store for tests and ephemeral sessions.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, ClientError> {
        self.entries
            .lock()
            .map_err(|e| ClientError::Storage(e.to_string()))
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ClientError> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a data directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_name(key)))
    }
}

/// Percent-encode every ASCII byte outside `[A-Za-z0-9._-]`, `%` included,
/// so distinct keys never share a file.
fn file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for c in key.chars() {
        if !c.is_ascii() || c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
            name.push(c);
        } else {
            name.push_str(&format!("%{:02X}", c as u32));
        }
    }
    name
}

#[async_trait]
impl LocalStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ClientError> {
        tokio::fs::create_dir_all(&self.root).await?;

        // Write then rename so a crash never leaves a truncated document
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientError> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("prep-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("user").await.unwrap(), None);

        save(&store, "user", &vec![1, 2, 3]).await.unwrap();
        let value: Option<Vec<i32>> = load(&store, "user").await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));

        store.remove("user").await.unwrap();
        store.remove("user").await.unwrap();
        assert_eq!(store.get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let store = MemoryStore::new();
        store.set("questions_x", "{not json".to_string()).await.unwrap();

        assert!(load::<Vec<i32>>(&store, "questions_x").await.is_err());
        assert_eq!(load_or_miss::<Vec<i32>>(&store, "questions_x").await, None);
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let root = temp_root();
        let store = FileStore::new(&root);

        assert_eq!(store.get("daily_question_2026-01-01").await.unwrap(), None);
        store
            .set("daily_question_2026-01-01", "\"q\"".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("daily_question_2026-01-01").await.unwrap().as_deref(),
            Some("\"q\"")
        );

        store.remove("daily_question_2026-01-01").await.unwrap();
        store.remove("daily_question_2026-01-01").await.unwrap();
        assert_eq!(store.get("daily_question_2026-01-01").await.unwrap(), None);

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[test]
    fn test_file_names_are_distinct_per_key() {
        assert_eq!(file_name("daily_question_2026-01-01"), "daily_question_2026-01-01");
        assert_eq!(file_name("a/b"), "a%2Fb");
        assert_eq!(file_name("a%2Fb"), "a%252Fb");
        assert_eq!(file_name("C:\\x"), "C%3A%5Cx");
        assert_ne!(file_name("a/b"), file_name("a_b"));
    }

    #[tokio::test]
    async fn test_file_store_escapes_path_separators() {
        let root = temp_root();
        let store = FileStore::new(&root);

        store
            .set("questions_Physics_Work/Energy_Power", "[1]".to_string())
            .await
            .unwrap();
        store
            .set("questions_Physics_Work_Energy_Power", "[2]".to_string())
            .await
            .unwrap();

        assert!(root.join("questions_Physics_Work%2FEnergy_Power.json").exists());
        assert_eq!(
            store
                .get("questions_Physics_Work/Energy_Power")
                .await
                .unwrap()
                .as_deref(),
            Some("[1]")
        );
        assert_eq!(
            store
                .get("questions_Physics_Work_Energy_Power")
                .await
                .unwrap()
                .as_deref(),
            Some("[2]")
        );

        tokio::fs::remove_dir_all(root).await.ok();
    }
}
