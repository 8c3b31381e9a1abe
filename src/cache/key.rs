//! Cache Key Module
//!
//! Builds deterministic cache keys from request parameters.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{GateError, Result};

// == Object Cache Key ==
/// Builds a cache key from named fields.
///
/// Field names are sorted lexicographically and rendered as `name=<json>`
/// pairs joined with `&`, so two requests with the same fields in a different
/// order map to the same key.
///
/// ```
/// use serde_json::json;
/// use promptgate::cache::object_cache_key;
///
/// let a = json!({"style": "loft", "count": 2});
/// let key = object_cache_key(a.as_object().unwrap());
/// assert_eq!(key, r#"count=2&style="loft""#);
/// ```
pub fn object_cache_key(fields: &Map<String, Value>) -> String {
    let mut pairs: Vec<(&String, &Value)> = fields.iter().collect();
    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

    pairs
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Serializes `params` to a JSON object and builds its cache key.
///
/// # Errors
/// `InvalidRequest` if `params` does not serialize to a JSON object.
pub fn object_cache_key_of<P: Serialize + ?Sized>(params: &P) -> Result<String> {
    let value = serde_json::to_value(params)
        .map_err(|e| GateError::Internal(format!("failed to serialize cache key fields: {}", e)))?;

    match value {
        Value::Object(fields) => Ok(object_cache_key(&fields)),
        other => Err(GateError::InvalidRequest(format!(
            "cache key fields must be an object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
