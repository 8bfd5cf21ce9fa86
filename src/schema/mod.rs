//! Compile-time schemas for typed stores.
//!
//! A schema is a closed set of flat string keys, each paired with the type
//! of the value stored under it. Schemas are declared with [`schema!`]:
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use typed_kv::{Composite, MemoryStore, TypedStore};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! pub struct Profile {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Composite for Profile {}
//!
//! typed_kv::schema! {
//!     /// Preferences kept by the settings screen.
//!     pub struct Prefs {
//!         pub Theme => "theme": String,
//!         pub Launches => "launches": u64,
//!         pub Owner => "owner": Profile,
//!         pub Recent => "recent": Vec<String>,
//!     }
//! }
//!
//! # async fn demo() -> Result<(), typed_kv::Error<std::convert::Infallible>> {
//! let prefs: TypedStore<Prefs, MemoryStore> = TypedStore::new(MemoryStore::new());
//!
//! prefs.set(Theme, "dark".to_string()).await?;
//! prefs.merge(Recent, vec!["notes.txt".to_string()]).await?;
//!
//! let ((_, theme), (_, launches)) = prefs.multi_get((Theme, Launches)).await?;
//! assert_eq!(theme.as_deref(), Some("dark"));
//! assert_eq!(launches, None);
//! # Ok(())
//! # }
//! # fn main() {}
//! ```
//!
//! # Rejected at compile time
//!
//! A key from another schema:
//!
//! ```compile_fail
//! use typed_kv::{MemoryStore, TypedStore};
//!
//! typed_kv::schema! {
//!     pub struct Prefs {
//!         pub Theme => "theme": String,
//!     }
//! }
//!
//! typed_kv::schema! {
//!     pub struct Audio {
//!         pub Volume => "volume": u8,
//!     }
//! }
//!
//! async fn write(prefs: &TypedStore<Prefs, MemoryStore>) {
//!     let _ = prefs.set(Volume, 3).await;
//! }
//! # fn main() {}
//! ```
//!
//! A value of the wrong type:
//!
//! ```compile_fail
//! use typed_kv::{MemoryStore, TypedStore};
//!
//! typed_kv::schema! {
//!     pub struct Prefs {
//!         pub Launches => "launches": u64,
//!     }
//! }
//!
//! async fn write(prefs: &TypedStore<Prefs, MemoryStore>) {
//!     let _ = prefs.set(Launches, "many".to_string()).await;
//! }
//! # fn main() {}
//! ```
//!
//! A merge on a scalar key:
//!
//! ```compile_fail
//! use typed_kv::{MemoryStore, TypedStore};
//!
//! typed_kv::schema! {
//!     pub struct Prefs {
//!         pub Theme => "theme": String,
//!     }
//! }
//!
//! async fn write(prefs: &TypedStore<Prefs, MemoryStore>) {
//!     let _ = prefs.merge(Theme, "dark".to_string()).await;
//! }
//! # fn main() {}
//! ```
//!
//! A batch whose second entry carries the first entry's value type:
//!
//! ```compile_fail
//! use typed_kv::{MemoryStore, TypedStore};
//!
//! typed_kv::schema! {
//!     pub struct Prefs {
//!         pub Theme => "theme": String,
//!         pub Launches => "launches": u64,
//!     }
//! }
//!
//! async fn write(prefs: &TypedStore<Prefs, MemoryStore>) {
//!     let _ = prefs
//!         .multi_set(((Theme, "dark".to_string()), (Launches, "dark".to_string())))
//!         .await;
//! }
//! # fn main() {}
//! ```
//!
//! The same key name declared twice:
//!
//! ```compile_fail
//! typed_kv::schema! {
//!     pub struct Prefs {
//!         pub Theme => "theme": String,
//!         pub Colors => "theme": Vec<String>,
//!     }
//! }
//! # fn main() {}
//! ```

pub mod batch;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use batch::{EntryBatch, KeyBatch, MergeBatch};

/// A closed mapping from key names to value types.
///
/// Implemented by the type generated by [`schema!`]; the schema type has no
/// runtime role besides parameterizing [`TypedStore`](crate::TypedStore).
pub trait Schema: Send + Sync + 'static {
    /// Every key name the schema declares, in declaration order.
    const KEYS: &'static [&'static str];
}

/// A key belonging to schema `S`.
///
/// Keys are zero-sized marker values; the string under which the entry is
/// stored is [`Key::NAME`].
pub trait Key<S: Schema>: Copy + Send + Sync + 'static {
    /// The value type stored under this key.
    type Value: Serialize + DeserializeOwned;

    /// The flat store key.
    const NAME: &'static str;
}

/// Marker for value types that serialize to a JSON object or array.
///
/// Only keys whose value type is `Composite` can be merged. Record types
/// opt in with an empty impl. `serde_json::Value` is accepted here because
/// its shape is only known at runtime; merging a scalar `Value` fails with
/// [`Error::InvalidMergeArgument`](crate::Error::InvalidMergeArgument).
pub trait Composite {}

impl<T> Composite for Vec<T> {}
impl<T> Composite for VecDeque<T> {}
impl<T, const N: usize> Composite for [T; N] {}
impl<T, H> Composite for HashSet<T, H> {}
impl<T> Composite for BTreeSet<T> {}
impl<K, V, H> Composite for HashMap<K, V, H> {}
impl<K, V> Composite for BTreeMap<K, V> {}
impl<T: Composite + ?Sized> Composite for Box<T> {}
impl Composite for serde_json::Map<String, serde_json::Value> {}
impl Composite for serde_json::Value {}

/// Returns `true` if no name appears twice in `keys`.
///
/// Used by [`schema!`] in a const assertion so that duplicate key names are
/// a build error.
pub const fn keys_are_unique(keys: &[&str]) -> bool {
    let mut rest = keys;
    while let [head, tail @ ..] = rest {
        let mut others = tail;
        while let [other, more @ ..] = others {
            if str_eq(*head, *other) {
                return false;
            }
            others = more;
        }
        rest = tail;
    }
    true
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());
    loop {
        match (a, b) {
            ([], []) => return true,
            ([x, a_rest @ ..], [y, b_rest @ ..]) if *x == *y => {
                a = a_rest;
                b = b_rest;
            }
            _ => return false,
        }
    }
}

/// Declare a schema type and its key types.
///
/// ```
/// typed_kv::schema! {
///     pub struct Session {
///         /// Bearer token of the signed-in user.
///         pub Token => "session.token": String,
///         pub Scopes => "session.scopes": Vec<String>,
///     }
/// }
///
/// use typed_kv::{Key, Schema};
/// assert_eq!(Session::KEYS, &["session.token", "session.scopes"]);
/// assert_eq!(<Token as Key<Session>>::NAME, "session.token");
/// ```
#[macro_export]
macro_rules! schema {
    (
        $(#[$meta:meta])*
        $vis:vis struct $schema:ident {
            $(
                $(#[$key_meta:meta])*
                $key_vis:vis $key:ident => $name:literal : $value:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $schema;

        impl $crate::schema::Schema for $schema {
            const KEYS: &'static [&'static str] = &[$($name),*];
        }

        const _: () = ::core::assert!(
            $crate::schema::keys_are_unique(<$schema as $crate::schema::Schema>::KEYS),
            "schema declares the same key name more than once"
        );

        $(
            $(#[$key_meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            $key_vis struct $key;

            impl $crate::schema::Key<$schema> for $key {
                type Value = $value;
                const NAME: &'static str = $name;
            }
        )*
    };
}
