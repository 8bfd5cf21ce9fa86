//! The underlying string key-value store.
//!
//! [`RawStore`] is the seam between the typed facade and whatever actually
//! persists entries. The facade never assumes it owns the namespace: other
//! callers may write to the same store under keys the schema does not know.

#[cfg(feature = "fjall")]
pub mod fjall;
pub mod memory;
pub mod merge;

use std::future::Future;
use std::sync::Arc;

/// An asynchronous store of string values under string keys.
///
/// Batch methods answer positionally: `multi_get` returns one pair per
/// requested key, in request order, with `None` for absent entries.
///
/// `merge` combines a JSON text with the JSON text already stored under the
/// key; the combination rule belongs to the store (see [`merge::shallow_merge`]
/// for the rule the bundled stores use).
pub trait RawStore: Send + Sync {
    /// The failure type reported by this store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the text stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Remove the entry under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Merge the JSON text `value` into the entry under `key`.
    fn merge(&self, key: &str, value: &str)
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Read several keys, answering in request order.
    fn multi_get(
        &self,
        keys: &[&str],
    ) -> impl Future<Output = Result<Vec<(String, Option<String>)>, Self::Error>> + Send;

    /// Store several entries.
    fn multi_set(
        &self,
        entries: &[(String, String)],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Merge several entries.
    fn multi_merge(
        &self,
        entries: &[(String, String)],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Remove several keys.
    fn multi_remove(&self, keys: &[&str])
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Every key currently held by the store, whoever wrote it.
    fn get_all_keys(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;

    /// Erase every entry in the store.
    fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send any reads the store is holding back for batching.
    fn flush_get_requests(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

macro_rules! delegate_raw_store {
    ($($ty:ty),+) => {$(
        impl<R: RawStore> RawStore for $ty {
            type Error = R::Error;

            fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send {
                (**self).get(key)
            }

            fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), Self::Error>> + Send {
                (**self).set(key, value)
            }

            fn remove(&self, key: &str) -> impl Future<Output = Result<(), Self::Error>> + Send {
                (**self).remove(key)
            }

            fn merge(&self, key: &str, value: &str) -> impl Future<Output = Result<(), Self::Error>> + Send {
                (**self).merge(key, value)
            }

            fn multi_get(
                &self,
                keys: &[&str],
            ) -> impl Future<Output = Result<Vec<(String, Option<String>)>, Self::Error>> + Send {
                (**self).multi_get(keys)
            }

            fn multi_set(
                &self,
                entries: &[(String, String)],
            ) -> impl Future<Output = Result<(), Self::Error>> + Send {
                (**self).multi_set(entries)
            }

            fn multi_merge(
                &self,
                entries: &[(String, String)],
            ) -> impl Future<Output = Result<(), Self::Error>> + Send {
                (**self).multi_merge(entries)
            }

            fn multi_remove(&self, keys: &[&str]) -> impl Future<Output = Result<(), Self::Error>> + Send {
                (**self).multi_remove(keys)
            }

            fn get_all_keys(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send {
                (**self).get_all_keys()
            }

            fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send {
                (**self).clear()
            }

            fn flush_get_requests(&self) -> impl Future<Output = Result<(), Self::Error>> + Send {
                (**self).flush_get_requests()
            }
        }
    )+};
}

delegate_raw_store!(Arc<R>, &R);
