// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical JSON rendering.
//!
//! Compact output with object keys sorted bytewise. Two documents that differ
//! only in key order render to the same string, which is what descriptor
//! equality, hashing and union member ordering are built on.

use serde_json::Value;

/// Render `value` as canonical JSON.
pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            out.push_str(&value.to_string());
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
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_recursively() {
        let a = json!({"b": 1, "a": {"d": [true, null], "c": "x"}});
        assert_eq!(
            to_canonical_json(&a),
            r#"{"a":{"c":"x","d":[true,null]},"b":1}"#
        );
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(to_canonical_json(&json!("a\"b")), r#""a\"b""#);
        assert_eq!(to_canonical_json(&json!({"k\n": 1})), r#"{"k\n":1}"#);
    }

    #[test]
    fn array_order_is_preserved() {
        assert_eq!(to_canonical_json(&json!([3, 1, 2])), "[3,1,2]");
    }
}
