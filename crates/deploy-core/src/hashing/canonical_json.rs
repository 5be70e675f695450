//! Canonical JSON minimal: claves de objetos ordenadas, sin espacios.
//!
//! Es la codificación que alimenta todos los hashes del core (salt, dirección
//! objetivo, hash del registro, fingerprint del run).

use serde_json::Value;
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Display de Value::String produce el literal JSON escapado.
        Value::String(_) => value.to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let tree: BTreeMap<&String, String> = map.iter().map(|(k, v)| (k, to_canonical_json(v))).collect();
            let items: Vec<String> = tree.into_iter()
                                         .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), v))
                                         .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_keys_are_sorted_recursively() {
        let v = json!({"b": {"z": 1, "a": [true, null]}, "a": "x"});
        assert_eq!(to_canonical_json(&v), r#"{"a":"x","b":{"a":[true,null],"z":1}}"#);
    }

    #[test]
    fn strings_are_escaped() {
        let v = json!("quote\"d");
        assert_eq!(to_canonical_json(&v), r#""quote\"d""#);
    }
}
