//! Field diff between a selected record and its edit draft
//!
//! Only keys that the draft actually carries are candidates for the patch: a
//! key missing from the draft is "undefined" and never sent, while JSON `null`
//! is a defined value that clears the field. Numbers are compared with a small
//! tolerance so a float that went through a form round trip does not show up
//! as a change.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Locally edited snapshot of a record
pub type EditDraft = Map<String, Value>;

/// Changed, defined fields sent on update
pub type Patch = Map<String, Value>;

/// Fields that are never part of a patch
pub const EXCLUDED_FIELDS: &[&str] = &["id"];

/// Float comparison tolerance
const FLOAT_EPSILON: f64 = 1e-9;

/// Structural equality with float tolerance
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(fa), Some(fb)) => (fa - fb).abs() < FLOAT_EPSILON,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(va, vb)| values_equal(va, vb))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, va)| b.get(key).is_some_and(|vb| values_equal(va, vb)))
        }
        _ => false,
    }
}

/// Keys of `draft` whose value differs from `original`, excluding `id`.
///
/// A key the original does not carry compares as `null`.
pub fn compute_patch(original: &Map<String, Value>, draft: &EditDraft) -> Patch {
    draft
        .iter()
        .filter(|(key, _)| !EXCLUDED_FIELDS.contains(&key.as_str()))
        .filter(|(key, value)| !values_equal(original.get(*key).unwrap_or(&Value::Null), value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Shallow merge: every key of `patch` overwrites `base`
pub fn merge(base: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
}

/// Serialize a record into its JSON object form
pub fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            Ok(map)
        }
    }
}

/// `{...item, ...patch}` decoded back into the record type
pub fn apply<T: Serialize + DeserializeOwned>(
    item: &T,
    patch: &Map<String, Value>,
) -> Result<T, serde_json::Error> {
    let mut object = to_object(item)?;
    merge(&mut object, patch);
    serde_json::from_value(Value::Object(object))
}
