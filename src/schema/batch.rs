//! Positional batch shapes for multi-key operations.
//!
//! Batches are tuples. Every position is checked against its own key, so a
//! batch may mix keys of different value types:
//!
//! ```ignore
//! prefs.multi_set(((Theme, "dark".to_string()), (Launches, 3))).await?;
//! let ((_, theme), (_, launches)) = prefs.multi_get((Theme, Launches)).await?;
//! ```
//!
//! Implementations cover tuples of one to twelve positions.

use std::vec::IntoIter;

use crate::codec;
use crate::error::Error;
use crate::logging::warn;

use super::{Composite, Key, Schema};

/// An ordered set of keys of schema `S`.
pub trait KeyBatch<S: Schema> {
    /// Positionally typed multi-read result: `(key, Option<value>)` per position.
    type Output;

    /// Store key names, in request order.
    fn names(&self) -> Vec<&'static str>;

    /// Pair a multi-read answer back up with the requested keys.
    ///
    /// The answer must list the requested keys in request order.
    fn decode<E>(self, raw: Vec<(String, Option<String>)>) -> Result<Self::Output, Error<E>>;
}

/// An ordered set of `(key, value)` entries of schema `S`.
pub trait EntryBatch<S: Schema> {
    /// Serialize every entry into `(store key, stored text)`.
    fn encode<E>(self) -> Result<Vec<(String, String)>, Error<E>>;
}

/// An ordered set of `(key, value)` entries whose values are all composite.
pub trait MergeBatch<S: Schema> {
    /// Serialize every entry, refusing values that are not objects or arrays.
    fn encode_merge<E>(self) -> Result<Vec<(String, String)>, Error<E>>;
}

/// Take the next answered entry and decode it as the value of `K`.
fn next_value<S, K, E>(
    raw: &mut IntoIter<(String, Option<String>)>,
) -> Result<Option<K::Value>, Error<E>>
where
    S: Schema,
    K: Key<S>,
{
    let Some((name, stored)) = raw.next() else {
        warn!(expected = K::NAME, "batch response ended early");
        return Err(Error::BatchMismatch {
            expected: K::NAME.to_string(),
            found: "end of response".to_string(),
        });
    };

    if name != K::NAME {
        warn!(expected = K::NAME, found = %name, "batch response out of order");
        return Err(Error::BatchMismatch {
            expected: K::NAME.to_string(),
            found: name,
        });
    }

    stored
        .map(|text| {
            codec::decode::<K::Value>(&text).map_err(|source| Error::Decode {
                key: K::NAME,
                source,
            })
        })
        .transpose()
}

fn ensure_exhausted<E>(mut raw: IntoIter<(String, Option<String>)>) -> Result<(), Error<E>> {
    match raw.next() {
        None => Ok(()),
        Some((name, _)) => {
            warn!(found = %name, "batch response has extra entries");
            Err(Error::BatchMismatch {
                expected: "end of response".to_string(),
                found: name,
            })
        }
    }
}

fn encode_entry<S, K, E>(value: &K::Value) -> Result<(String, String), Error<E>>
where
    S: Schema,
    K: Key<S>,
{
    let text = codec::encode(value).map_err(|source| Error::Encode {
        key: K::NAME,
        source,
    })?;
    Ok((K::NAME.to_string(), text))
}

fn encode_merge_entry<S, K, E>(value: &K::Value) -> Result<(String, String), Error<E>>
where
    S: Schema,
    K: Key<S>,
    K::Value: Composite,
{
    let text = codec::encode_composite::<S, K, E>(value)?;
    Ok((K::NAME.to_string(), text))
}

macro_rules! impl_batches {
    ($($K:ident $k:ident $v:ident),+) => {
        impl<S: Schema, $($K: Key<S>),+> KeyBatch<S> for ($($K,)+) {
            type Output = ($(($K, Option<<$K as Key<S>>::Value>),)+);

            fn names(&self) -> Vec<&'static str> {
                vec![$(<$K as Key<S>>::NAME),+]
            }

            fn decode<E>(
                self,
                raw: Vec<(String, Option<String>)>,
            ) -> Result<Self::Output, Error<E>> {
                let ($($k,)+) = self;
                let mut raw = raw.into_iter();
                let output = ($(($k, next_value::<S, $K, E>(&mut raw)?),)+);
                ensure_exhausted::<E>(raw)?;
                Ok(output)
            }
        }

        impl<S: Schema, $($K: Key<S>),+> EntryBatch<S>
            for ($(($K, <$K as Key<S>>::Value),)+)
        {
            fn encode<E>(self) -> Result<Vec<(String, String)>, Error<E>> {
                let ($((_, $v),)+) = self;
                Ok(vec![$(encode_entry::<S, $K, E>(&$v)?),+])
            }
        }

        impl<S: Schema, $($K: Key<S>),+> MergeBatch<S>
            for ($(($K, <$K as Key<S>>::Value),)+)
        where
            $(<$K as Key<S>>::Value: Composite,)+
        {
            fn encode_merge<E>(self) -> Result<Vec<(String, String)>, Error<E>> {
                let ($((_, $v),)+) = self;
                Ok(vec![$(encode_merge_entry::<S, $K, E>(&$v)?),+])
            }
        }
    };
}

impl_batches!(K1 k1 v1);
impl_batches!(K1 k1 v1, K2 k2 v2);
impl_batches!(K1 k1 v1, K2 k2 v2, K3 k3 v3);
impl_batches!(K1 k1 v1, K2 k2 v2, K3 k3 v3, K4 k4 v4);
impl_batches!(K1 k1 v1, K2 k2 v2, K3 k3 v3, K4 k4 v4, K5 k5 v5);
impl_batches!(K1 k1 v1, K2 k2 v2, K3 k3 v3, K4 k4 v4, K5 k5 v5, K6 k6 v6);
impl_batches!(K1 k1 v1, K2 k2 v2, K3 k3 v3, K4 k4 v4, K5 k5 v5, K6 k6 v6, K7 k7 v7);
impl_batches!(K1 k1 v1, K2 k2 v2, K3 k3 v3, K4 k4 v4, K5 k5 v5, K6 k6 v6, K7 k7 v7, K8 k8 v8);
impl_batches!(
    K1 k1 v1, K2 k2 v2, K3 k3 v3, K4 k4 v4, K5 k5 v5, K6 k6 v6, K7 k7 v7, K8 k8 v8, K9 k9 v9
);
impl_batches!(
    K1 k1 v1, K2 k2 v2, K3 k3 v3, K4 k4 v4, K5 k5 v5, K6 k6 v6, K7 k7 v7, K8 k8 v8, K9 k9 v9,
    K10 k10 v10
);
impl_batches!(
    K1 k1 v1, K2 k2 v2, K3 k3 v3, K4 k4 v4, K5 k5 v5, K6 k6 v6, K7 k7 v7, K8 k8 v8, K9 k9 v9,
    K10 k10 v10, K11 k11 v11
);
impl_batches!(
    K1 k1 v1, K2 k2 v2, K3 k3 v3, K4 k4 v4, K5 k5 v5, K6 k6 v6, K7 k7 v7, K8 k8 v8, K9 k9 v9,
    K10 k10 v10, K11 k11 v11, K12 k12 v12
);
