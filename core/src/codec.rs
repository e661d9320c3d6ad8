//! JSON text codec for wire maps.
//!
//! Entities travel as flat JSON objects. Explicit nulls survive both
//! directions, and string/number/boolean values keep their JSON type.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ApiError, Result};

/// Wire-name keyed map as it appears on the wire.
pub type WireMap = serde_json::Map<String, Value>;

pub fn encode(map: &WireMap) -> Result<String> {
    serde_json::to_string(map).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Decode a body that must be a JSON object.
pub fn decode(body: &str) -> Result<WireMap> {
    match serde_json::from_str(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ApiError::Deserialization(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(ApiError::Deserialization(e.to_string())),
    }
}

pub fn encode_string_map(map: &BTreeMap<String, String>) -> Result<String> {
    serde_json::to_string(map).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Decode a string-to-string object, as used by the attributes endpoints.
pub fn decode_string_map(body: &str) -> Result<BTreeMap<String, String>> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn encode_keeps_explicit_null() {
        let mut map = WireMap::new();
        map.insert("email".to_string(), Value::Null);
        map.insert("name".to_string(), json!("Acme"));
        let text = encode(&map).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, json!({"email": null, "name": "Acme"}));
    }

    #[test]
    fn decode_preserves_value_kinds() {
        let map = decode(r#"{"a":"1","b":1,"c":true,"d":null}"#).unwrap();
        assert!(map["a"].is_string());
        assert!(map["b"].is_number());
        assert!(map["c"].is_boolean());
        assert!(map.contains_key("d") && map["d"].is_null());
    }

    #[test]
    fn decode_rejects_non_objects() {
        let err = decode("[1,2]").unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(msg) if msg.contains("an array")));
        assert!(matches!(decode("not json"), Err(ApiError::Deserialization(_))));
    }

    #[test]
    fn string_map_rejects_non_string_values() {
        assert!(decode_string_map(r#"{"plan":"gold"}"#).is_ok());
        assert!(matches!(
            decode_string_map(r#"{"plan":3}"#),
            Err(ApiError::Deserialization(_))
        ));
    }
}
