//! In-process store.

use std::collections::BTreeMap;
use std::convert::Infallible;

use tokio::sync::RwLock;

use super::RawStore;
use super::merge::shallow_merge;

/// A [`RawStore`] that keeps entries in memory.
///
/// Nothing is persisted. Keys are enumerated in lexicographic order. Batch
/// writes hold the write lock for the whole batch, so each batch is applied
/// atomically with respect to other callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given raw entries.
    ///
    /// Useful for values written outside the typed facade, such as text
    /// written by older code that did not encode values as JSON.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Number of entries currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl RawStore for MemoryStore {
    type Error = Infallible;

    async fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Infallible> {
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Infallible> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn merge(&self, key: &str, value: &str) -> Result<(), Infallible> {
        let mut entries = self.entries.write().await;
        let merged = shallow_merge(entries.get(key).map(String::as_str), value);
        entries.insert(key.to_owned(), merged);
        Ok(())
    }

    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>, Infallible> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .map(|key| ((*key).to_owned(), entries.get(*key).cloned()))
            .collect())
    }

    async fn multi_set(&self, pairs: &[(String, String)]) -> Result<(), Infallible> {
        let mut entries = self.entries.write().await;
        for (key, value) in pairs {
            entries.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn multi_merge(&self, pairs: &[(String, String)]) -> Result<(), Infallible> {
        let mut entries = self.entries.write().await;
        for (key, value) in pairs {
            let merged = shallow_merge(entries.get(key).map(String::as_str), value);
            entries.insert(key.clone(), merged);
        }
        Ok(())
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), Infallible> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, Infallible> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }

    async fn clear(&self) -> Result<(), Infallible> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn flush_get_requests(&self) -> Result<(), Infallible> {
        // Reads are answered immediately; nothing is ever pending.
        Ok(())
    }
}
