//! Helpers for walking untyped JSON payloads
//!
//! Paths are dot-separated object keys, e.g. `graphql.user.edge_follow.count`.
//! A `null` value is treated the same as a missing one.

use serde_json::Value;

use crate::{Error, Result};

/// Look up a dotted path
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for key in path.split('.').filter(|k| !k.is_empty()) {
        current = current.get(key)?;
    }
    (!current.is_null()).then_some(current)
}

/// Look up a dotted path, failing with [`Error::Parse`] when it is absent
pub fn required<'a>(value: &'a Value, path: &str) -> Result<&'a Value> {
    lookup(value, path).ok_or_else(|| Error::Parse(format!("missing field '{}'", path)))
}

/// First of several alternative paths that resolves
pub fn lookup_any<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup(value, path))
}

pub fn opt_str(value: &Value, path: &str) -> Option<String> {
    lookup(value, path).and_then(as_string)
}

pub fn opt_u64(value: &Value, path: &str) -> Option<u64> {
    lookup(value, path).and_then(as_u64)
}

pub fn opt_bool(value: &Value, path: &str) -> Option<bool> {
    lookup(value, path).and_then(|v| v.as_bool())
}

pub fn req_str(value: &Value, path: &str) -> Result<String> {
    as_string(required(value, path)?)
        .ok_or_else(|| Error::Parse(format!("field '{}' is not a string", path)))
}

pub fn req_u64(value: &Value, path: &str) -> Result<u64> {
    as_u64(required(value, path)?)
        .ok_or_else(|| Error::Parse(format!("field '{}' is not an integer", path)))
}

pub fn req_bool(value: &Value, path: &str) -> Result<bool> {
    required(value, path)?
        .as_bool()
        .ok_or_else(|| Error::Parse(format!("field '{}' is not a boolean", path)))
}

/// Nodes of a `{ "edges": [ { "node": ... } ] }` connection
pub fn edge_nodes<'a>(connection: &'a Value) -> impl Iterator<Item = &'a Value> {
    connection
        .get("edges")
        .and_then(|e| e.as_array())
        .into_iter()
        .flatten()
        .filter_map(|edge| edge.get("node"))
}

// Ids arrive either as strings or as numbers depending on the endpoint.
fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
