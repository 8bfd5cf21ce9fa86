//! Common test utilities and fixtures.
//!
//! Shared schemas, value types and store doubles for the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_kv::{Composite, MemoryStore, RawStore};

// =============================================================================
// Value Types
// =============================================================================

/// Record type used for merge tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub email: Option<String>,
}

impl Composite for Profile {}

/// Partial profile update; only the fields present are merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Composite for ProfilePatch {}

/// Unit enum, stored as its bare variant name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

/// Claims to be composite but serializes to a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counter(pub u64);

impl Composite for Counter {}

// =============================================================================
// Schemas
// =============================================================================

typed_kv::schema! {
    /// Application preferences.
    pub struct Prefs {
        pub Greeting => "greeting": String,
        pub Mode => "mode": Theme,
        pub Launches => "launches": u64,
        pub Ratio => "ratio": f64,
        pub Owner => "owner": Profile,
        pub OwnerPatch => "owner.patch": ProfilePatch,
        pub Recent => "recent": Vec<String>,
        pub Nickname => "nickname": Option<String>,
        pub Anything => "anything": serde_json::Value,
        pub Hits => "hits": Counter,
    }
}

typed_kv::schema! {
    /// A second schema sharing a store with [`Prefs`].
    pub struct Session {
        pub Token => "session.token": String,
        pub Scopes => "session.scopes": Vec<String>,
    }
}

typed_kv::schema! {
    /// Integers wider than 64 bits.
    pub struct Ledger {
        pub Total => "ledger.total": u128,
        pub Balance => "ledger.balance": i128,
    }
}

// =============================================================================
// Store Doubles
// =============================================================================

/// Wraps a [`MemoryStore`] and records every call that reaches it.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            inner: MemoryStore::with_entries(entries.iter().copied()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Names of the store operations called so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Raw text currently stored under `key`.
    pub async fn raw_value(&self, key: &str) -> Option<String> {
        match self.inner.get(key).await {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    fn record(&self, call: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
    }
}

impl RawStore for RecordingStore {
    type Error = std::convert::Infallible;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.record("get");
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.record("set");
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.record("remove");
        self.inner.remove(key).await
    }

    async fn merge(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.record("merge");
        self.inner.merge(key, value).await
    }

    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>, Self::Error> {
        self.record("multi_get");
        self.inner.multi_get(keys).await
    }

    async fn multi_set(&self, entries: &[(String, String)]) -> Result<(), Self::Error> {
        self.record("multi_set");
        self.inner.multi_set(entries).await
    }

    async fn multi_merge(&self, entries: &[(String, String)]) -> Result<(), Self::Error> {
        self.record("multi_merge");
        self.inner.multi_merge(entries).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), Self::Error> {
        self.record("multi_remove");
        self.inner.multi_remove(keys).await
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, Self::Error> {
        self.record("get_all_keys");
        self.inner.get_all_keys().await
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        self.record("clear");
        self.inner.clear().await
    }

    async fn flush_get_requests(&self) -> Result<(), Self::Error> {
        self.record("flush_get_requests");
        self.inner.flush_get_requests().await
    }
}

/// Failure reported by [`FailingStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("quota exceeded")]
pub struct QuotaExceeded;

/// A store whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingStore;

impl RawStore for FailingStore {
    type Error = QuotaExceeded;

    async fn get(&self, _key: &str) -> Result<Option<String>, QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn remove(&self, _key: &str) -> Result<(), QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn merge(&self, _key: &str, _value: &str) -> Result<(), QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn multi_get(&self, _keys: &[&str]) -> Result<Vec<(String, Option<String>)>, QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn multi_set(&self, _entries: &[(String, String)]) -> Result<(), QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn multi_merge(&self, _entries: &[(String, String)]) -> Result<(), QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn multi_remove(&self, _keys: &[&str]) -> Result<(), QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn clear(&self) -> Result<(), QuotaExceeded> {
        Err(QuotaExceeded)
    }

    async fn flush_get_requests(&self) -> Result<(), QuotaExceeded> {
        Err(QuotaExceeded)
    }
}

/// A store that answers multi-reads in reverse order.
#[derive(Debug, Default)]
pub struct ReversingStore {
    pub inner: MemoryStore,
}

impl RawStore for ReversingStore {
    type Error = std::convert::Infallible;

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.inner.remove(key).await
    }

    async fn merge(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.inner.merge(key, value).await
    }

    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>, Self::Error> {
        let mut answer = self.inner.multi_get(keys).await?;
        answer.reverse();
        Ok(answer)
    }

    async fn multi_set(&self, entries: &[(String, String)]) -> Result<(), Self::Error> {
        self.inner.multi_set(entries).await
    }

    async fn multi_merge(&self, entries: &[(String, String)]) -> Result<(), Self::Error> {
        self.inner.multi_merge(entries).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), Self::Error> {
        self.inner.multi_remove(keys).await
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, Self::Error> {
        self.inner.get_all_keys().await
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        self.inner.clear().await
    }

    async fn flush_get_requests(&self) -> Result<(), Self::Error> {
        self.inner.flush_get_requests().await
    }
}
