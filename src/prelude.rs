//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```ignore
//! use typed_kv::prelude::*;
//!
//! let prefs: TypedStore<Prefs, _> = TypedStore::new(MemoryStore::new());
//! let theme = with_callback(prefs.get(Theme), |outcome| log(outcome)).await?;
//! ```

// Errors
pub use crate::error::{Error, Result};

// Schemas
pub use crate::schema::{Composite, Key, Schema};

// Stores
pub use crate::store::RawStore;
pub use crate::store::memory::MemoryStore;
pub use crate::typed::TypedStore;

// Persistent store (requires "fjall" feature)
#[cfg(feature = "fjall")]
pub use crate::config::{Durability, StoreConfig};
#[cfg(feature = "fjall")]
pub use crate::store::fjall::{FjallStore, FjallStoreError};

// Completion callbacks
pub use crate::callback::with_callback;
