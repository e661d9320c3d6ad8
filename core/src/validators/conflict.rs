//! Extraction of the conflicting entity's id from a conflict response.
//!
//! The shape of the conflict payload is not guaranteed, so every failure
//! here degrades to `None` and the caller falls back to a generic rejection.

use serde_json::Value;
use tracing::warn;

/// Keys that may hold the id of the entity that already exists, in lookup
/// order.
pub const CONFLICT_ID_KEYS: [&str; 2] = ["id", "gid"];

/// Parse `body` as a JSON object and return the conflicting entity's id.
pub fn extract_conflicting_id(body: &str) -> Option<String> {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "conflict body is not valid JSON");
            return None;
        }
    };
    let Some(object) = parsed.as_object() else {
        warn!("conflict body is not a JSON object");
        return None;
    };
    let id = CONFLICT_ID_KEYS
        .iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .find(|id| !id.is_empty())
        .map(str::to_string);
    if id.is_none() {
        warn!("conflict body carries no conflicting id");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_id_key() {
        assert_eq!(
            extract_conflicting_id(r#"{"id":"abc123"}"#),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn falls_back_to_gid() {
        let body = r#"{"code":409,"message":"exists","gid":"g-9"}"#;
        assert_eq!(extract_conflicting_id(body), Some("g-9".to_string()));
    }

    #[test]
    fn malformed_bodies_yield_none() {
        for body in ["", "not json", "[]", "\"abc\"", r#"{"message":"exists"}"#, r#"{"id":42}"#, r#"{"id":""}"#] {
            assert_eq!(extract_conflicting_id(body), None, "{body:?}");
        }
    }
}
