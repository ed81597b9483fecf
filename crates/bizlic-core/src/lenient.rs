//! Lenient field decoders for service payloads.
//!
//! The generation service is model-backed; a field that should be a string
//! sometimes arrives as a number, a list as a scalar. These decoders accept
//! whatever JSON is present and keep what is usable.

use serde_json::{Map, Value};

/// Render a JSON scalar as display text. Objects, arrays and null yield `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Truthiness as the intake forms and the service use it.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Collect the items of a JSON array as strings, skipping nulls and
/// stringifying other non-string items. Non-arrays yield an empty list.
pub(crate) fn string_items(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Typed views over the attributes of a received JSON object.
pub(crate) struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    pub(crate) fn new(map: &'a Map<String, Value>) -> Self {
        Self(map)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }

    pub(crate) fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }

    /// Scalars are kept as-is; containers and null read as absent.
    pub(crate) fn scalar(&self, key: &str) -> Option<Value> {
        self.get(key)
            .filter(|v| !matches!(v, Value::Null | Value::Array(_) | Value::Object(_)))
            .cloned()
    }

    /// Present keys are judged by truthiness, so `null` reads as `Some(false)`.
    pub(crate) fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(truthy)
    }

    pub(crate) fn count(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn strings(&self, key: &str) -> Vec<String> {
        self.get(key).map(string_items).unwrap_or_default()
    }

    /// Attributes not named in `known`.
    pub(crate) fn extra(&self, known: &[&str]) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(key, _)| !known.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
