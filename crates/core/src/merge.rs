//! JSON merge patch (RFC 7386).
//!
//! A patch object describes changes to a target document:
//!
//! - a key present with `null` removes that key from the target
//! - a key present with any other value replaces it (recursively for objects)
//! - keys absent from the patch are left untouched
//!
//! A patch that is not an object replaces the target wholesale.

use serde_json::Value;

/// Returns the result of applying `patch` to `target`.
pub fn merged(mut target: Value, patch: &Value) -> Value {
    json_patch::merge(&mut target, patch);
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_removes_and_value_adds() {
        let result = merged(json!({"a": 1, "b": 2}), &json!({"b": null, "c": 3}));
        assert_eq!(result, json!({"a": 1, "c": 3}));
    }

    #[test]
    fn test_value_overwrites() {
        let result = merged(json!({"a": "b"}), &json!({"a": "c"}));
        assert_eq!(result, json!({"a": "c"}));
    }

    #[test]
    fn test_nested_objects_merge_recursively() {
        let target = json!({"title": "Goodbye!", "author": {"givenName": "John", "familyName": "Doe"}, "tags": ["example", "sample"], "content": "This will be unchanged"});
        let patch = json!({"title": "Hello!", "phoneNumber": "+01-123-456-7890", "author": {"familyName": null}, "tags": ["example"]});

        let result = merged(target, &patch);

        assert_eq!(
            result,
            json!({
                "title": "Hello!",
                "author": {"givenName": "John"},
                "tags": ["example"],
                "content": "This will be unchanged",
                "phoneNumber": "+01-123-456-7890"
            })
        );
    }

    #[test]
    fn test_arrays_are_replaced_not_merged() {
        let result = merged(json!({"a": [1, 2]}), &json!({"a": [3]}));
        assert_eq!(result, json!({"a": [3]}));
    }

    #[test]
    fn test_object_patch_over_scalar_builds_object() {
        let result = merged(json!({"a": "foo"}), &json!({"a": {"b": "c"}}));
        assert_eq!(result, json!({"a": {"b": "c"}}));
    }

    #[test]
    fn test_nested_null_in_new_object_is_dropped() {
        let result = merged(json!({}), &json!({"a": {"bb": {"ccc": null}}}));
        assert_eq!(result, json!({"a": {"bb": {}}}));
    }

    #[test]
    fn test_non_object_patch_replaces_target() {
        assert_eq!(merged(json!({"a": 1}), &json!(["x"])), json!(["x"]));
        assert_eq!(merged(json!({"a": 1}), &json!(null)), json!(null));
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let target = json!({"a": 1, "b": {"c": true}});
        assert_eq!(merged(target.clone(), &json!({})), target);
    }
}
