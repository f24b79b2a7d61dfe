// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lenient route path encoding.
//!
//! Paths are stored as compact JSON text. Clients send them either as a JSON
//! list or as a string holding JSON, so decoding accepts both and degrades to
//! a caller-chosen fallback instead of failing. Point shapes are not checked:
//! whatever structure was stored comes back unchanged.

use serde_json::Value;

/// Decode a path that may already be a list or may be JSON text.
///
/// Returns `None` for absent input, blank or unparsable text, and any other
/// JSON type. Text that parses to a non-list value is returned as parsed.
pub fn decode(input: Option<&Value>) -> Option<Value> {
    match input? {
        list @ Value::Array(_) => Some(list.clone()),
        Value::String(text) => decode_text(Some(text)),
        _ => None,
    }
}

/// Decode JSON text, `None` when blank or unparsable.
pub fn decode_text(raw: Option<&str>) -> Option<Value> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Decode with an explicit fallback.
pub fn decode_or(input: Option<&Value>, fallback: Value) -> Value {
    decode(input).unwrap_or(fallback)
}

/// Decode a stored column; unreadable text reads back as an empty list.
pub fn decode_stored(raw: Option<&str>) -> Value {
    decode_text(raw).unwrap_or_else(|| Value::Array(Vec::new()))
}

/// Encode a list of points as compact JSON. Non-ASCII text is kept as-is.
pub fn encode(points: &[Value]) -> String {
    Value::Array(points.to_vec()).to_string()
}

/// Deep equality that compares numbers by value, so `37` equals `37.0`.
///
/// Clients differ in whether they print whole-number coordinates with a
/// fractional part.
pub fn same_path(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_path(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| same_path(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_then_decode_round_trips() {
        let points = vec![
            json!([37.5665, 126.978]),
            json!({"lat": 37.57, "lng": 126.98, "label": "시청"}),
            json!(null),
        ];
        let encoded = encode(&points);
        assert_eq!(decode_text(Some(&encoded)), Some(Value::Array(points)));
    }

    #[test]
    fn test_encode_is_compact_and_keeps_unicode() {
        let encoded = encode(&[json!([1, 2]), json!("광화문")]);
        assert_eq!(encoded, "[[1,2],\"광화문\"]");
    }

    #[test]
    fn test_fallback_for_missing_blank_and_invalid() {
        let fallback = json!(["fallback"]);
        assert_eq!(decode_or(None, fallback.clone()), fallback);
        assert_eq!(decode_or(Some(&json!("")), fallback.clone()), fallback);
        assert_eq!(decode_or(Some(&json!("   ")), fallback.clone()), fallback);
        assert_eq!(decode_or(Some(&json!("[1, 2")), fallback.clone()), fallback);
        assert_eq!(decode_or(Some(&json!(42)), fallback.clone()), fallback);
        assert_eq!(decode_or(Some(&json!({"a": 1})), fallback.clone()), fallback);
    }

    #[test]
    fn test_json_array_text_is_parsed() {
        let decoded = decode(Some(&json!(" [[1.5, 2.5], [3.5, 4.5]] ")));
        assert_eq!(decoded, Some(json!([[1.5, 2.5], [3.5, 4.5]])));
    }

    #[test]
    fn test_list_is_returned_unchanged() {
        let list = json!([{"x": 1}, [2, 3], "four"]);
        assert_eq!(decode(Some(&list)), Some(list));
    }

    #[test]
    fn test_non_list_text_is_returned_as_parsed() {
        assert_eq!(decode(Some(&json!("{\"a\": 1}"))), Some(json!({"a": 1})));
        assert_eq!(decode(Some(&json!("7"))), Some(json!(7)));
    }

    #[test]
    fn test_decode_stored_defaults_to_empty_list() {
        assert_eq!(decode_stored(None), json!([]));
        assert_eq!(decode_stored(Some("")), json!([]));
        assert_eq!(decode_stored(Some("{{")), json!([]));
        assert_eq!(decode_stored(Some("[[0,0]]")), json!([[0, 0]]));
    }

    #[test]
    fn test_same_path_compares_numbers_by_value() {
        assert!(same_path(&json!([[37.0, 127.0]]), &json!([[37, 127]])));
        assert!(same_path(
            &json!([{"lat": 37, "lng": 127.5}]),
            &json!([{"lng": 127.5, "lat": 37.0}])
        ));
        assert!(!same_path(&json!([[37.0, 127.0]]), &json!([[37, 128]])));
        assert!(!same_path(&json!([[37, 127]]), &json!([[37, 127], [0, 0]])));
        assert!(!same_path(&json!(["37"]), &json!([37])));
        assert!(!same_path(&json!([{"lat": 37}]), &json!([{"lng": 37}])));
    }
}
