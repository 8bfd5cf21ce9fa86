//! The typed store facade.

use std::marker::PhantomData;

use crate::codec;
use crate::error::{Error, Result};
use crate::logging::debug;
use crate::schema::{Composite, EntryBatch, Key, KeyBatch, MergeBatch, Schema};
use crate::store::RawStore;

/// A view of a [`RawStore`] restricted to the keys and value types of schema `S`.
///
/// Values are serialized on the way in and parsed on the way out (see
/// [`codec`]). Nothing is cached: every call goes to the store. Operations
/// that do not involve values (key enumeration, clearing, flushing) are
/// passed through untouched and are not limited to the schema's keys.
///
/// The store is injected, so several facades with different schemas can
/// share one store through an `Arc` or a reference.
///
/// # Example
///
/// ```ignore
/// use typed_kv::{MemoryStore, TypedStore};
///
/// let prefs: TypedStore<Prefs, _> = TypedStore::new(MemoryStore::new());
///
/// prefs.set(Theme, "dark".to_string()).await?;
/// assert_eq!(prefs.get(Theme).await?.as_deref(), Some("dark"));
///
/// prefs.multi_set(((Theme, "light".to_string()), (Launches, 3))).await?;
/// let ((_, theme), (_, launches)) = prefs.multi_get((Theme, Launches)).await?;
/// ```
pub struct TypedStore<S, R> {
    raw: R,
    _schema: PhantomData<fn() -> S>,
}

impl<S, R> TypedStore<S, R>
where
    S: Schema,
    R: RawStore,
{
    /// Wrap `raw` in a facade for schema `S`.
    pub fn new(raw: R) -> Self {
        Self {
            raw,
            _schema: PhantomData,
        }
    }

    /// The underlying store.
    pub fn raw(&self) -> &R {
        &self.raw
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> R {
        self.raw
    }

    /// Key names declared by the schema.
    pub fn schema_keys(&self) -> &'static [&'static str] {
        S::KEYS
    }

    /// Read the value stored under `key`.
    ///
    /// Returns `None` when the key has no entry. A stored JSON `null` is a
    /// value, not an absence: for `Option<T>` keys it reads as `Some(None)`.
    pub async fn get<K: Key<S>>(&self, _key: K) -> Result<Option<K::Value>, R::Error> {
        debug!(key = K::NAME, "get");
        let raw = self.raw.get(K::NAME).await.map_err(Error::Store)?;
        raw.map(|text| decode_value::<S, K, R::Error>(&text))
            .transpose()
    }

    /// Read a value written by code that did not encode values as JSON.
    ///
    /// The stored text goes through [`codec::parse_legacy`]: numeric text
    /// becomes a number, bracketed JSON becomes structured, anything else
    /// stays a string.
    pub async fn get_legacy<K: Key<S>>(&self, _key: K) -> Result<Option<K::Value>, R::Error> {
        debug!(key = K::NAME, "get (legacy parsing)");
        let raw = self.raw.get(K::NAME).await.map_err(Error::Store)?;
        raw.map(|text| {
            codec::decode_legacy::<K::Value>(&text).map_err(|source| Error::Decode {
                key: K::NAME,
                source,
            })
        })
        .transpose()
    }

    /// Store `value` under `key`.
    pub async fn set<K: Key<S>>(&self, _key: K, value: K::Value) -> Result<(), R::Error> {
        debug!(key = K::NAME, "set");
        let text = codec::encode(&value).map_err(|source| Error::Encode {
            key: K::NAME,
            source,
        })?;
        self.raw.set(K::NAME, &text).await.map_err(Error::Store)
    }

    /// Remove the entry under `key`.
    pub async fn remove<K: Key<S>>(&self, _key: K) -> Result<(), R::Error> {
        debug!(key = K::NAME, "remove");
        self.raw.remove(K::NAME).await.map_err(Error::Store)
    }

    /// Merge `value` into the entry under `key`.
    ///
    /// Only keys with a [`Composite`] value type can be merged. The value
    /// must serialize to a JSON object or array; anything else fails with
    /// [`Error::InvalidMergeArgument`] without contacting the store.
    pub async fn merge<K>(&self, _key: K, value: K::Value) -> Result<(), R::Error>
    where
        K: Key<S>,
        K::Value: Composite,
    {
        debug!(key = K::NAME, "merge");
        let text = codec::encode_composite::<S, K, R::Error>(&value)?;
        self.raw.merge(K::NAME, &text).await.map_err(Error::Store)
    }

    /// Read several keys at once.
    ///
    /// The answer is a tuple with one `(key, Option<value>)` per requested
    /// key, in request order, each typed after its own key.
    pub async fn multi_get<B: KeyBatch<S>>(&self, keys: B) -> Result<B::Output, R::Error> {
        let names = keys.names();
        debug!(keys = ?names, "multi_get");
        let raw = self.raw.multi_get(&names).await.map_err(Error::Store)?;
        keys.decode(raw)
    }

    /// Store several entries at once.
    pub async fn multi_set<B: EntryBatch<S>>(&self, entries: B) -> Result<(), R::Error> {
        let encoded = entries.encode::<R::Error>()?;
        debug!(count = encoded.len(), "multi_set");
        self.raw.multi_set(&encoded).await.map_err(Error::Store)
    }

    /// Merge several entries at once.
    ///
    /// Every value is checked before any is sent: one non-composite value
    /// fails the whole call without contacting the store.
    pub async fn multi_merge<B: MergeBatch<S>>(&self, entries: B) -> Result<(), R::Error> {
        let encoded = entries.encode_merge::<R::Error>()?;
        debug!(count = encoded.len(), "multi_merge");
        self.raw.multi_merge(&encoded).await.map_err(Error::Store)
    }

    /// Remove several keys at once.
    pub async fn multi_remove<B: KeyBatch<S>>(&self, keys: B) -> Result<(), R::Error> {
        let names = keys.names();
        debug!(keys = ?names, "multi_remove");
        self.raw.multi_remove(&names).await.map_err(Error::Store)
    }

    /// Every key in the store, including keys this schema does not declare.
    pub async fn get_all_keys(&self) -> Result<Vec<String>, R::Error> {
        debug!("get_all_keys");
        self.raw.get_all_keys().await.map_err(Error::Store)
    }

    /// Keys in the store that this schema declares, in store order.
    pub async fn stored_schema_keys(&self) -> Result<Vec<&'static str>, R::Error> {
        let stored = self.get_all_keys().await?;
        Ok(stored
            .iter()
            .filter_map(|key| S::KEYS.iter().copied().find(|name| *name == key.as_str()))
            .collect())
    }

    /// Erase the whole store.
    ///
    /// This is not scoped to the schema: entries written by any other caller
    /// of the same store are erased too.
    pub async fn clear(&self) -> Result<(), R::Error> {
        debug!("clear");
        self.raw.clear().await.map_err(Error::Store)
    }

    /// Ask the store to send any reads it is holding back for batching.
    pub async fn flush_get_requests(&self) -> Result<(), R::Error> {
        debug!("flush_get_requests");
        self.raw.flush_get_requests().await.map_err(Error::Store)
    }
}

fn decode_value<S, K, E>(text: &str) -> Result<K::Value, E>
where
    S: Schema,
    K: Key<S>,
{
    codec::decode::<K::Value>(text).map_err(|source| Error::Decode {
        key: K::NAME,
        source,
    })
}

impl<S, R: Clone> Clone for TypedStore<S, R> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _schema: PhantomData,
        }
    }
}

impl<S, R: std::fmt::Debug> std::fmt::Debug for TypedStore<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedStore")
            .field("schema", &std::any::type_name::<S>())
            .field("raw", &self.raw)
            .finish()
    }
}
