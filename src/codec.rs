//! Value text encoding.
//!
//! The underlying store only holds strings. Values are written as JSON
//! except when they serialize to a JSON string, in which case the bare text
//! is written so that plain strings are not double-quoted.
//!
//! Reading is strict JSON with a textual fallback: a value that was written
//! as bare text is handed to the target type as a string. JSON is
//! deserialized straight into the target type, never through an
//! intermediate `serde_json::Value`.
//!
//! [`parse_legacy`] is a separate heuristic for values written by code that
//! did not use JSON at all. It is never applied on the regular read path.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};

use crate::error::Error;
use crate::logging::{error, trace};
use crate::schema::{Composite, Key, Schema};

/// Encode a value as store text.
///
/// ```
/// use std::collections::BTreeMap;
///
/// assert_eq!(typed_kv::codec::encode("hello").unwrap(), "hello");
/// assert_eq!(typed_kv::codec::encode(&42).unwrap(), "42");
///
/// let record = BTreeMap::from([("a", 1)]);
/// assert_eq!(typed_kv::codec::encode(&record).unwrap(), r#"{"a":1}"#);
/// ```
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    if json.starts_with('"') {
        // A JSON string literal: store the text it denotes.
        return serde_json::from_str::<String>(&json);
    }
    Ok(json)
}

/// Decode store text as `T`.
///
/// [`encode`] never writes JSON with surrounding whitespace and never writes
/// a JSON string literal, so text that is padded or starts with `"` can only
/// be bare text. It is offered to `T` as a string first. Any other text is
/// deserialized straight into `T` as JSON (so integers wider than 64 bits
/// keep their precision) and falls back to the raw text as a string.
/// When both attempts fail the first error is returned.
///
/// ```
/// use typed_kv::codec::decode;
///
/// assert_eq!(decode::<u128>(&u128::MAX.to_string()).unwrap(), u128::MAX);
/// assert_eq!(decode::<Option<String>>(" null").unwrap().as_deref(), Some(" null"));
/// ```
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    let as_text = || serde_json::from_value::<T>(Value::String(raw.to_owned()));
    let as_json = || serde_json::from_str::<T>(raw);

    if raw.starts_with('"') || raw.trim() != raw {
        return as_text().or_else(|err| {
            trace!(error = %err, "bare text rejected, trying JSON");
            as_json().map_err(|_| err)
        });
    }

    as_json().or_else(|err| {
        trace!(error = %err, "not JSON of the expected shape, trying raw text");
        as_text().map_err(|_| err)
    })
}

/// Interpret text written without structured encoding.
///
/// - Text that parses as a number and prints back identically is a number.
/// - Text enclosed in `{}` or `[]` that is valid JSON is that JSON value.
/// - Anything else is a string.
///
/// ```
/// use serde_json::json;
/// use typed_kv::codec::parse_legacy;
///
/// assert_eq!(parse_legacy("42"), json!(42));
/// assert_eq!(parse_legacy("1.5"), json!(1.5));
/// assert_eq!(parse_legacy("1.50"), json!("1.50"));
/// assert_eq!(parse_legacy(r#"{"a":1}"#), json!({"a": 1}));
/// assert_eq!(parse_legacy("hello"), json!("hello"));
/// ```
pub fn parse_legacy(raw: &str) -> Value {
    if let Some(number) = parse_lossless_number(raw) {
        return Value::Number(number);
    }

    if is_bracketed(raw) {
        if let Ok(value) = serde_json::from_str(raw) {
            return value;
        }
    }

    Value::String(raw.to_owned())
}

/// Decode legacy text as `T` via [`parse_legacy`].
pub fn decode_legacy<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_value(parse_legacy(raw))
}

fn parse_lossless_number(raw: &str) -> Option<Number> {
    if let Ok(n) = raw.parse::<i64>() {
        return (n.to_string() == raw).then(|| Number::from(n));
    }
    if let Ok(n) = raw.parse::<u64>() {
        return (n.to_string() == raw).then(|| Number::from(n));
    }
    let n = raw.parse::<f64>().ok()?;
    if n.to_string() != raw {
        return None;
    }
    Number::from_f64(n)
}

fn is_bracketed(raw: &str) -> bool {
    (raw.starts_with('{') && raw.ends_with('}')) || (raw.starts_with('[') && raw.ends_with(']'))
}

/// Encode a merge value, refusing anything that is not an object or array.
pub(crate) fn encode_composite<S, K, E>(value: &K::Value) -> Result<String, Error<E>>
where
    S: Schema,
    K: Key<S>,
    K::Value: Composite,
{
    let json = serde_json::to_string(value).map_err(|source| Error::Encode {
        key: K::NAME,
        source,
    })?;

    match json.as_bytes().first() {
        Some(b'{') | Some(b'[') => Ok(json),
        first => {
            let found = json_kind(first.copied());
            error!(key = K::NAME, found, "refusing to merge non-composite value");
            Err(Error::InvalidMergeArgument {
                key: K::NAME,
                found,
            })
        }
    }
}

fn json_kind(first: Option<u8>) -> &'static str {
    match first {
        Some(b'n') => "null",
        Some(b't') | Some(b'f') => "a boolean",
        Some(b'"') => "a string",
        Some(_) => "a number",
        None => "nothing",
    }
}
