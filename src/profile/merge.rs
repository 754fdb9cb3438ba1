//! Deep merge of configuration documents

use serde_json::Value;

/// Recursively merge `overlay` onto `base`. Objects are merged key by key,
/// with the overlay's leaf values winning and keys only present in the
/// overlay added. Everything else (arrays included) is replaced wholesale.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Non-destructive variant of deep_merge().
pub fn merged(base: &Value, overlay: &Value) -> Value {
    let mut result = base.clone();
    deep_merge(&mut result, overlay.clone());
    result
}

#[cfg(test)]
mod check {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_keys_merge() {
        let base = json!({"a": {"x": 1, "y": 2}});
        let overlay = json!({"a": {"y": 3, "z": 4}});

        assert_eq!(merged(&base, &overlay), json!({"a": {"x": 1, "y": 3, "z": 4}}));
    }

    #[test]
    fn arrays_replaced_wholesale() {
        let base = json!({"list": [1, 2, 3], "keep": true});
        let overlay = json!({"list": [9]});

        assert_eq!(merged(&base, &overlay), json!({"list": [9], "keep": true}));
    }

    #[test]
    fn mismatched_kinds_replaced() {
        let base = json!({"scale": "fit", "inner": {"a": 1}});
        let overlay = json!({"scale": 1.5, "inner": "flat"});

        assert_eq!(merged(&base, &overlay), json!({"scale": 1.5, "inner": "flat"}));
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let base = json!({"a": {"b": {"c": 1}}});
        assert_eq!(merged(&base, &json!({})), base);
    }
}
