//! Persistent store backed by fjall.

use std::collections::BTreeMap;
use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::{Durability, StoreConfig};
use crate::logging::{debug, info};

use super::RawStore;
use super::merge::shallow_merge;

/// Errors reported by [`FjallStore`].
#[derive(Error, Debug)]
pub enum FjallStoreError {
    #[error("fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("value stored under '{key}' is not valid UTF-8")]
    InvalidUtf8 {
        key: String,
        source: std::string::FromUtf8Error,
    },
}

/// A [`RawStore`] persisted in a fjall database.
///
/// All entries live in a single keyspace of the database. Each write call
/// (including each batch call) is persisted according to the configured
/// [`Durability`] before it returns. Batch calls and `clear` are committed
/// as one fjall write batch, so they apply entirely or not at all. Merges
/// are read-modify-write and are serialized with each other by an internal
/// lock.
///
/// fjall calls are synchronous; they run on the calling task.
///
/// # Example
///
/// ```ignore
/// use typed_kv::{FjallStore, StoreConfig, TypedStore};
///
/// let config = StoreConfig::from_file("store.toml")?;
/// let prefs: TypedStore<Prefs, _> = TypedStore::new(FjallStore::from_config(&config)?);
/// ```
pub struct FjallStore {
    db: fjall::Database,
    entries: Keyspace,
    durability: Durability,
    merge_lock: Mutex<()>,
}

impl FjallStore {
    /// Open (or create) a store at `path` with the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FjallStoreError> {
        Self::from_config(&StoreConfig::new(path.as_ref()))
    }

    /// Open (or create) a store as described by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self, FjallStoreError> {
        info!(
            path = %config.path.display(),
            keyspace = %config.keyspace,
            "opening fjall store"
        );

        let db = fjall::Database::builder(&config.path).open()?;
        let entries = db.keyspace(&config.keyspace, KeyspaceCreateOptions::default)?;

        Ok(Self {
            db,
            entries,
            durability: config.durability,
            merge_lock: Mutex::new(()),
        })
    }

    fn persist(&self) -> Result<(), FjallStoreError> {
        let mode = match self.durability {
            Durability::SyncAll => PersistMode::SyncAll,
            Durability::SyncData => PersistMode::SyncData,
            Durability::Buffer => PersistMode::Buffer,
            Durability::None => return Ok(()),
        };
        self.db.persist(mode)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>, FjallStoreError> {
        let Some(bytes) = self.entries.get(key)? else {
            return Ok(None);
        };
        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|source| FjallStoreError::InvalidUtf8 {
                key: key.to_owned(),
                source,
            })
    }

    /// Merge every pair in order and commit the results as one batch.
    ///
    /// Later pairs for the same key merge into the result of earlier ones.
    fn merge_all<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), FjallStoreError> {
        let mut merged: BTreeMap<&str, String> = BTreeMap::new();
        for (key, value) in pairs {
            let existing = match merged.remove(key) {
                Some(pending) => Some(pending),
                None => self.read(key)?,
            };
            merged.insert(key, shallow_merge(existing.as_deref(), value));
        }

        let mut batch = self.db.batch();
        for (key, value) in &merged {
            batch.insert(&self.entries, *key, value.as_bytes());
        }
        batch.commit()?;
        self.persist()
    }

    fn keys(&self) -> Result<Vec<Vec<u8>>, FjallStoreError> {
        let keys = self
            .entries
            .iter()
            .map(|kv| kv.key().map(|k| k.to_vec()))
            .collect::<Result<Vec<_>, fjall::Error>>()?;
        Ok(keys)
    }
}

impl RawStore for FjallStore {
    type Error = FjallStoreError;

    async fn get(&self, key: &str) -> Result<Option<String>, FjallStoreError> {
        self.read(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), FjallStoreError> {
        self.entries.insert(key, value.as_bytes())?;
        self.persist()
    }

    async fn remove(&self, key: &str) -> Result<(), FjallStoreError> {
        self.entries.remove(key)?;
        self.persist()
    }

    async fn merge(&self, key: &str, value: &str) -> Result<(), FjallStoreError> {
        let _guard = self.merge_lock.lock().await;
        self.merge_all([(key, value)])
    }

    async fn multi_get(
        &self,
        keys: &[&str],
    ) -> Result<Vec<(String, Option<String>)>, FjallStoreError> {
        keys.iter()
            .map(|key| Ok(((*key).to_owned(), self.read(key)?)))
            .collect()
    }

    async fn multi_set(&self, pairs: &[(String, String)]) -> Result<(), FjallStoreError> {
        let mut batch = self.db.batch();
        for (key, value) in pairs {
            batch.insert(&self.entries, key, value.as_bytes());
        }
        batch.commit()?;
        self.persist()
    }

    async fn multi_merge(&self, pairs: &[(String, String)]) -> Result<(), FjallStoreError> {
        let _guard = self.merge_lock.lock().await;
        self.merge_all(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), FjallStoreError> {
        let mut batch = self.db.batch();
        for key in keys {
            batch.remove(&self.entries, *key);
        }
        batch.commit()?;
        self.persist()
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, FjallStoreError> {
        Ok(self
            .keys()?
            .into_iter()
            .map(|k| String::from_utf8_lossy(&k).into_owned())
            .collect())
    }

    async fn clear(&self) -> Result<(), FjallStoreError> {
        let keys = self.keys()?;
        debug!(count = keys.len(), "clearing fjall store");
        let mut batch = self.db.batch();
        for key in &keys {
            batch.remove(&self.entries, key);
        }
        batch.commit()?;
        self.persist()
    }

    async fn flush_get_requests(&self) -> Result<(), FjallStoreError> {
        // Reads go straight to the engine; nothing is ever pending.
        Ok(())
    }
}
