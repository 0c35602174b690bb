//! Client-side text filter over the fetched event page.
//!
//! Pure view transform: filtering never touches server-side pagination, so
//! the displayed total may exceed the filtered row count.

use serde_json::Value;

use crate::api::models::Event;

/// How far into the preview object the scan descends: the preview's own
/// scalar fields plus scalars nested one level deeper.
const PREVIEW_SCAN_DEPTH: usize = 2;

/// Apply the filter text to a page of events, returning indices of matching
/// entries. Indices into the original slice avoid copying events and keep
/// row selection stable across recomputes.
pub fn apply_filter(events: &[Event], text: &str) -> Vec<usize> {
    if text.is_empty() {
        return (0..events.len()).collect();
    }

    let needle = text.to_lowercase();

    events
        .iter()
        .enumerate()
        .filter(|(_, event)| matches(event, &needle))
        .map(|(idx, _)| idx)
        .collect()
}

/// Case-insensitive substring match against the resource field, extended by
/// a bounded-depth scan of the preview's scalar fields.
fn matches(event: &Event, needle: &str) -> bool {
    if let Some(resource) = &event.resource {
        if resource.to_lowercase().contains(needle) {
            return true;
        }
    }

    if let Some(preview) = event.preview() {
        let value = serde_json::to_value(preview).unwrap_or(Value::Null);
        if value_matches(&value, needle, PREVIEW_SCAN_DEPTH) {
            return true;
        }
    }

    false
}

fn value_matches(value: &Value, needle: &str, depth: usize) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Bool(b) => b.to_string().contains(needle),
        Value::Null => false,
        Value::Object(map) => depth > 0 && map.values().any(|v| value_matches(v, needle, depth - 1)),
        Value::Array(items) => depth > 0 && items.iter().any(|v| value_matches(v, needle, depth - 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Preview;

    fn event_with_resource(resource: &str) -> Event {
        Event {
            resource: Some(resource.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_filter_returns_all() {
        let events = vec![event_with_resource("MLA1"), event_with_resource("MLB2")];
        assert_eq!(apply_filter(&events, ""), vec![0, 1]);
    }

    #[test]
    fn resource_substring_match() {
        let events = vec![event_with_resource("MLA1"), event_with_resource("MLB2")];
        assert_eq!(apply_filter(&events, "MLA"), vec![0]);
    }

    #[test]
    fn non_matching_filter_returns_empty() {
        let events = vec![event_with_resource("MLA1"), event_with_resource("MLB2")];
        assert!(apply_filter(&events, "orders").is_empty());
    }

    #[test]
    fn match_is_case_insensitive() {
        let events = vec![event_with_resource("/items/MLA123")];
        assert_eq!(apply_filter(&events, "mla"), vec![0]);
        assert_eq!(apply_filter(&events, "ITEMS"), vec![0]);
    }

    #[test]
    fn preview_scalars_participate() {
        let events = vec![Event {
            preview: Some(Preview {
                title: Some("Wireless Keyboard".to_string()),
                price: Some(4999.0),
                ..Default::default()
            }),
            ..Default::default()
        }];
        assert_eq!(apply_filter(&events, "keyboard"), vec![0]);
        assert_eq!(apply_filter(&events, "4999"), vec![0]);
    }

    #[test]
    fn preview_scan_depth_is_bounded() {
        let mut preview = Preview::default();
        preview.extra.insert(
            "attributes".to_string(),
            serde_json::json!({ "color": "red" }),
        );
        preview.extra.insert(
            "nested".to_string(),
            serde_json::json!({ "deeper": { "hidden": "periwinkle" } }),
        );
        let events = vec![Event {
            preview: Some(preview),
            ..Default::default()
        }];

        // One level below the preview is scanned; two levels is not.
        assert_eq!(apply_filter(&events, "red"), vec![0]);
        assert!(apply_filter(&events, "periwinkle").is_empty());
    }

    #[test]
    fn events_without_resource_only_match_via_preview() {
        let events = vec![Event::default()];
        assert!(apply_filter(&events, "anything").is_empty());
    }
}
