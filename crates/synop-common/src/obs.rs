//! Decoded observation values and the JSON sanitizer.
//!
//! Telegram decoders report missing observations with non-finite floats
//! (NaN for an absent reading, infinities for out-of-range sentinels).
//! JSON has no representation for those, so every value tree is passed
//! through [`ObsValue::sanitize`] before it reaches the store or a
//! response body.
//!
//! `ObsValue` keeps map entries in insertion order, so sanitizing a tree
//! never reorders keys.

use serde_json::{Map, Number, Value};

/// A decoded observation value: the payload shape a telegram processor
/// produces for one report. Structurally a JSON tree, except floats may
/// be non-finite until sanitized.
#[derive(Debug, Clone, PartialEq)]
pub enum ObsValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Seq(Vec<ObsValue>),
    /// Insertion-ordered key/value pairs.
    Map(Vec<(String, ObsValue)>),
}

impl ObsValue {
    /// Returns a copy of the tree with every non-finite float replaced by
    /// `Null`. All other scalars, the nesting structure, and map key order
    /// are left unchanged. Idempotent: sanitizing a sanitized tree is a
    /// no-op.
    pub fn sanitize(&self) -> ObsValue {
        match self {
            ObsValue::Float(f) if !f.is_finite() => ObsValue::Null,
            ObsValue::Seq(items) => ObsValue::Seq(items.iter().map(ObsValue::sanitize).collect()),
            ObsValue::Map(entries) => ObsValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.sanitize()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Total conversion into a JSON value. Any float `serde_json` cannot
    /// represent (non-finite) becomes `Null`, so the result is always
    /// JSON-safe even for an unsanitized tree.
    pub fn into_json(self) -> Value {
        match self {
            ObsValue::Null => Value::Null,
            ObsValue::Bool(b) => Value::Bool(b),
            ObsValue::Int(i) => Value::Number(Number::from(i)),
            ObsValue::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            ObsValue::Text(s) => Value::String(s),
            ObsValue::Seq(items) => {
                Value::Array(items.into_iter().map(ObsValue::into_json).collect())
            }
            ObsValue::Map(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (k, v) in entries {
                    map.insert(k, v.into_json());
                }
                Value::Object(map)
            }
        }
    }

    /// Looks up a key in a `Map` value. Returns `None` for non-map values.
    pub fn get(&self, key: &str) -> Option<&ObsValue> {
        match self {
            ObsValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Removes a key from a `Map` value, returning the removed value.
    pub fn remove(&mut self, key: &str) -> Option<ObsValue> {
        match self {
            ObsValue::Map(entries) => {
                let idx = entries.iter().position(|(k, _)| k == key)?;
                Some(entries.remove(idx).1)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ObsValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ObsValue::Int(i) => Some(*i),
            ObsValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }
}

impl From<Value> for ObsValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ObsValue::Null,
            Value::Bool(b) => ObsValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ObsValue::Int(i)
                } else {
                    // u64 beyond i64::MAX or a fractional number.
                    ObsValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => ObsValue::Text(s),
            Value::Array(items) => ObsValue::Seq(items.into_iter().map(ObsValue::from).collect()),
            Value::Object(map) => {
                ObsValue::Map(map.into_iter().map(|(k, v)| (k, ObsValue::from(v))).collect())
            }
        }
    }
}
