//! Numeric id derivation for records addressed only by URI.
//!
//! The event list and the event talk list identify entries by `uri`
//! (`http://api.joind.in/v2.1/events/42`) without an `id` field. The id is the
//! trailing run of ASCII digits of that URI.

use serde_json::Value;
use tracing::warn;

use crate::types::Record;

/// Trailing integer of `uri`, if it ends in digits that fit a `u64`.
pub fn trailing_id(uri: &str) -> Option<u64> {
    let digits = &uri[uri.trim_end_matches(|c: char| c.is_ascii_digit()).len()..];
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Sets `id` on every entry whose `uri` ends in an integer, replacing any
/// existing `id`.
///
/// Entries without a string `uri`, or whose URI does not end in digits, are
/// left exactly as they were.
pub fn assign_ids_from_uri(entries: &mut [Record]) {
    for entry in entries.iter_mut() {
        let uri = entry.get("uri");
        match uri.and_then(Value::as_str).and_then(trailing_id) {
            Some(id) => {
                entry.insert("id".to_string(), Value::from(id));
            }
            None => warn!(?uri, "cannot derive id from entry uri"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn trailing_digits_become_the_id() {
        let mut entries = vec![record(json!({"uri": "http://api.example.com/events/42"}))];
        assign_ids_from_uri(&mut entries);
        assert_eq!(
            Value::Object(entries.remove(0)),
            json!({"uri": "http://api.example.com/events/42", "id": 42})
        );
    }

    #[test]
    fn existing_id_is_overwritten() {
        let mut entries = vec![record(json!({"uri": "http://x/talks/7", "id": "seven"}))];
        assign_ids_from_uri(&mut entries);
        assert_eq!(entries[0]["id"], json!(7));
    }

    #[test]
    fn uri_without_trailing_digits_leaves_entry_unchanged() {
        let original = json!({"uri": "http://api.example.com/events/phpbnl", "id": 3});
        let mut entries = vec![
            record(original.clone()),
            record(json!({"uri": "http://api.example.com/events/12/"})),
        ];
        assign_ids_from_uri(&mut entries);
        assert_eq!(Value::Object(entries[0].clone()), original);
        assert!(!entries[1].contains_key("id"));
    }

    #[test]
    fn entries_without_string_uri_are_skipped() {
        let mut entries = vec![record(json!({"name": "no uri"})), record(json!({"uri": 42}))];
        assign_ids_from_uri(&mut entries);
        assert!(!entries[0].contains_key("id"));
        assert!(!entries[1].contains_key("id"));
    }

    #[test]
    fn trailing_id_edge_cases() {
        assert_eq!(trailing_id("http://api.joind.in/v2.1/talks/10023"), Some(10023));
        assert_eq!(trailing_id("123"), Some(123));
        assert_eq!(trailing_id(""), None);
        assert_eq!(trailing_id("events/abc"), None);
        assert_eq!(trailing_id("events/99999999999999999999999"), None);
    }
}
