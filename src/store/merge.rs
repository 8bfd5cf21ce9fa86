//! Store-side merge rule shared by the bundled stores.

use serde_json::Value;

/// Combine the stored JSON text with an incoming JSON text.
///
/// When both sides are JSON objects the incoming top-level fields overwrite
/// the stored ones and the other stored fields are kept. In every other case
/// (no stored value, either side not an object, or either side not valid
/// JSON) the incoming text replaces the stored one.
pub fn shallow_merge(existing: Option<&str>, incoming: &str) -> String {
    let Some(existing) = existing else {
        return incoming.to_owned();
    };

    let parsed = (
        serde_json::from_str::<Value>(existing),
        serde_json::from_str::<Value>(incoming),
    );
    match parsed {
        (Ok(Value::Object(mut base)), Ok(Value::Object(update))) => {
            base.extend(update);
            Value::Object(base).to_string()
        }
        _ => incoming.to_owned(),
    }
}
