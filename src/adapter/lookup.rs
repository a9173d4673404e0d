//! Null-tolerant traversal of nested JSON records and text sanitization
//!
//! Registry records are heterogeneous: any module or key may be missing, and
//! occasionally a value has an unexpected shape. Lookups stop at the first
//! missing step (or non-object) and yield `None` instead of failing.

use crate::graph::PropertyValue;
use serde_json::Value;

/// Placeholder stored for missing or unresolvable values
pub const SENTINEL: &str = "N/A";

/// Replacement for embedded newlines
pub const NEWLINE_DELIMITER: char = '|';

/// Follow `path` through nested objects. JSON `null` counts as missing.
pub fn lookup<'a, I, S>(value: &'a Value, path: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut current = value;
    for step in path {
        current = current.as_object()?.get(step.as_ref())?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Resolve a string at `path`, sanitized. Empty strings count as missing.
pub fn lookup_text<I, S>(value: &Value, path: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lookup(value, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(sanitize)
}

/// Resolve an array at `path`. Anything else counts as missing.
pub fn lookup_array<I, S>(value: &Value, path: I) -> Option<&Vec<Value>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lookup(value, path).and_then(Value::as_array)
}

/// Resolve an array of strings at `path`, sanitized; non-string entries are skipped.
pub fn lookup_text_list<I, S>(value: &Value, path: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lookup_array(value, path)
        .map(|items| items.iter().filter_map(Value::as_str).map(sanitize).collect())
        .unwrap_or_default()
}

/// Make text safe for flat downstream storage: `"` becomes `'`, newlines
/// become `|`, carriage returns are dropped.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push('\''),
            '\n' => out.push(NEWLINE_DELIMITER),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// The sentinel as a property value
pub fn sentinel() -> PropertyValue {
    PropertyValue::String(SENTINEL.to_string())
}

/// `Some(text)` as a property, or the sentinel
pub fn text_or_sentinel(text: Option<String>) -> PropertyValue {
    text.map(PropertyValue::String).unwrap_or_else(sentinel)
}

/// Convert a resolved JSON value into a sanitized property.
///
/// Null, empty strings and empty arrays become the sentinel; strings are
/// sanitized, as are string elements of arrays.
pub fn to_property(value: Option<&Value>) -> PropertyValue {
    match value {
        None | Some(Value::Null) => sentinel(),
        Some(Value::String(s)) if s.is_empty() => sentinel(),
        Some(Value::Array(items)) if items.is_empty() => sentinel(),
        Some(other) => convert(other),
    }
}

fn convert(value: &Value) -> PropertyValue {
    match value {
        Value::Null => sentinel(),
        Value::String(s) => PropertyValue::String(sanitize(s)),
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => PropertyValue::Int(i),
            None => PropertyValue::Float(n.as_f64().unwrap_or_default()),
        },
        Value::Array(items) => PropertyValue::Array(items.iter().map(convert).collect()),
        Value::Object(map) => PropertyValue::Object(
            map.iter().map(|(k, v)| (k.clone(), convert(v))).collect(),
        ),
    }
}
