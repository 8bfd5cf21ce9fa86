//! Schema-checked typed access to asynchronous string key-value stores.
//!
//! A schema declares, once, which keys exist and what type of value each
//! holds. [`TypedStore`] then only accepts calls that fit the schema: an
//! unknown key, a value of the wrong type or a merge on a scalar key does
//! not compile. Values are serialized to text on the way in and parsed back
//! on the way out, so the underlying store only ever sees strings.
//!
//! # Quick Start
//!
//! ```ignore
//! use typed_kv::prelude::*;
//!
//! typed_kv::schema! {
//!     pub struct Prefs {
//!         pub Theme => "theme": String,
//!         pub Recent => "recent": Vec<String>,
//!     }
//! }
//!
//! let prefs: TypedStore<Prefs, _> = TypedStore::new(MemoryStore::new());
//! prefs.set(Theme, "dark".to_string()).await?;
//! prefs.merge(Recent, vec!["notes.txt".to_string()]).await?;
//! let ((_, theme), (_, recent)) = prefs.multi_get((Theme, Recent)).await?;
//! ```
//!
//! # Modules
//!
//! - [`schema`] - Schema, key and batch traits, and the [`schema!`] macro
//! - [`codec`] - Value text encoding, including the legacy parser
//! - [`store`] - The [`RawStore`] trait and the bundled stores
//! - [`callback`] - Completion-callback adapter for any operation
//! - [`config`] - Persistent store configuration (requires `fjall` feature)
//!
//! # Feature Flags
//!
//! - `fjall` - Enable [`FjallStore`], a persistent store (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `full` - Enable all features

#[macro_use]
pub(crate) mod logging;

pub mod callback;
pub mod codec;
#[cfg(feature = "fjall")]
pub mod config;
mod error;
pub mod prelude;
pub mod schema;
pub mod store;
mod typed;

pub use error::{Error, Result};
pub use schema::{Composite, EntryBatch, Key, KeyBatch, MergeBatch, Schema};
pub use store::RawStore;
pub use store::memory::MemoryStore;
pub use typed::TypedStore;

#[cfg(feature = "fjall")]
pub use config::{ConfigError, Durability, StoreConfig};
#[cfg(feature = "fjall")]
pub use store::fjall::{FjallStore, FjallStoreError};
