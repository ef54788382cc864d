//! Completion hooks: response shaping run after every successful command.

use serde_json::Value;

/// Reshapes a decoded response body before it is returned to the caller.
pub trait CompletionHook: Send + Sync {
    fn complete(&self, response: Value) -> Value;
}

/// Default hook: drops the `meta` envelope and unwraps a lone payload key.
///
/// `{"events": [...], "meta": {...}}` becomes `[...]`. An object left with
/// zero or several keys is returned as is. Non-object bodies pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripMeta;

impl CompletionHook for StripMeta {
    fn complete(&self, response: Value) -> Value {
        let mut map = match response {
            Value::Object(map) => map,
            other => return other,
        };
        map.remove("meta");
        if map.len() != 1 {
            return Value::Object(map);
        }
        map.into_iter().next().map_or(Value::Null, |(_, payload)| payload)
    }
}

/// Returns the decoded body untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

impl CompletionHook for Raw {
    fn complete(&self, response: Value) -> Value {
        response
    }
}

impl<F> CompletionHook for F
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn complete(&self, response: Value) -> Value {
        self(response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strips_meta_and_unwraps_single_key() {
        let response = json!({
            "events": [{"name": "PHP Benelux"}, {"name": "SunshinePHP"}],
            "meta": {"count": 2, "total": 2, "this_page": "http://api.joind.in/v2.1/events"}
        });
        assert_eq!(
            StripMeta.complete(response),
            json!([{"name": "PHP Benelux"}, {"name": "SunshinePHP"}])
        );
    }

    #[test]
    fn keeps_mapping_with_several_keys() {
        let response = json!({"events": [1], "users": [2], "meta": {"count": 1}});
        assert_eq!(StripMeta.complete(response), json!({"events": [1], "users": [2]}));
    }

    #[test]
    fn unwraps_without_meta_present() {
        assert_eq!(StripMeta.complete(json!({"talks": []})), json!([]));
    }

    #[test]
    fn meta_only_leaves_empty_mapping() {
        assert_eq!(StripMeta.complete(json!({"meta": {"count": 0}})), json!({}));
    }

    #[test]
    fn non_object_passes_through() {
        assert_eq!(StripMeta.complete(json!(["Event not found"])), json!(["Event not found"]));
        assert_eq!(StripMeta.complete(Value::Null), Value::Null);
    }

    #[test]
    fn raw_is_identity() {
        let response = json!({"events": [], "meta": {}});
        assert_eq!(Raw.complete(response.clone()), response);
    }

    #[test]
    fn closures_are_hooks() {
        let hook = |v: Value| json!({ "wrapped": v });
        assert_eq!(hook.complete(json!(1)), json!({"wrapped": 1}));
    }
}
