//! Runtime error type for typed store operations.
//!
//! Schema violations (unknown keys, mismatched values, merges on scalar keys)
//! never reach this type: they are rejected when the calling code is
//! compiled. What remains are codec failures, invalid merge arguments and
//! whatever the underlying store reports.

use thiserror::Error;

/// Errors returned by [`TypedStore`](crate::TypedStore) operations.
///
/// `E` is the error type of the underlying [`RawStore`](crate::RawStore).
/// Store failures are carried unchanged in [`Error::Store`].
///
/// # Example
///
/// ```ignore
/// use typed_kv::{Error, MemoryStore, TypedStore};
///
/// match prefs.merge(Profile, serde_json::Value::Null).await {
///     Err(Error::InvalidMergeArgument { key, found }) => {
///         eprintln!("cannot merge {found} into {key}");
///     }
///     other => other?,
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error<E> {
    /// Failure reported by the underlying store.
    #[error(transparent)]
    Store(E),

    /// The value could not be serialized to JSON.
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },

    /// The stored text could not be read back as the key's declared type.
    #[error("failed to decode value for key '{key}': {source}")]
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },

    /// A merge was attempted with a value that is not a JSON object or array.
    #[error("merge on key '{key}' requires an object or array, got {found}")]
    InvalidMergeArgument {
        key: &'static str,
        found: &'static str,
    },

    /// A multi-read answer does not line up with the requested keys.
    #[error("batch response mismatch: expected {expected}, found {found}")]
    BatchMismatch { expected: String, found: String },
}

/// A [`Result`] type alias over [`Error`].
pub type Result<T, E> = std::result::Result<T, Error<E>>;

impl<E> Error<E> {
    /// Returns `true` if the operation was refused before reaching the store
    /// because its argument was invalid.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidMergeArgument { .. })
    }

    /// Returns `true` if the underlying store reported the failure.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Borrow the store error, if this is one.
    pub fn store_error(&self) -> Option<&E> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }

    /// Take the store error, if this is one.
    pub fn into_store_error(self) -> Option<E> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}
