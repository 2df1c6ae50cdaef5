use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::sync::Mutex;

use crate::error::AppResult;

/// String-keyed device storage
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removing a missing key is not an error
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Writes all entries in one step; either every entry lands or none does
    async fn set_many(&self, entries: &[(String, String)]) -> AppResult<()>;

    /// Removes all keys in one step
    async fn remove_many(&self, keys: &[String]) -> AppResult<()>;
}

/// Key-value pairs kept in a single JSON object file
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a partial file.
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> AppResult<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }

    async fn set_many(&self, pairs: &[(String, String)]) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.extend(pairs.iter().cloned());
        self.write_entries(&entries).await
    }

    async fn remove_many(&self, keys: &[String]) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        let before = entries.len();
        entries.retain(|key, _| !keys.contains(key));
        if entries.len() != before {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

/// Volatile storage for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn set_many(&self, pairs: &[(String, String)]) -> AppResult<()> {
        self.entries.lock().await.extend(pairs.iter().cloned());
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> AppResult<()> {
        let mut entries = self.entries.lock().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
