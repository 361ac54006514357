//! Title and editor extraction from page records.

use crate::notion::Page;

/// Title used when a page has no readable title.
pub const UNTITLED_PLACEHOLDER: &str = "제목 없음";

/// Plain text of the page's title property.
///
/// Only the first title-typed property is examined; a well-formed page has
/// exactly one.
#[must_use]
pub fn extract_title(page: &Page) -> &str {
    page.properties
        .as_ref()
        .and_then(|properties| properties.values().find(|value| value.is_title()))
        .and_then(|value| value.title.as_deref())
        .and_then(|spans| spans.first())
        .and_then(|span| span.plain_text.as_deref())
        .unwrap_or(UNTITLED_PLACEHOLDER)
}

/// ID of the user who last edited the page.
#[must_use]
pub fn extract_editor_id(page: &Page) -> Option<&str> {
    page.last_edited_by.as_ref().map(|user| user.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn page(extra: Value) -> Page {
        let mut value = json!({
            "id": "page-1",
            "url": "https://www.notion.so/page-1",
            "last_edited_time": "2025-12-16T05:00:00.000Z"
        });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_title_from_title_property() {
        let page = page(json!({
            "properties": {
                "Status": { "type": "status", "status": { "name": "Done" } },
                "이름": {
                    "type": "title",
                    "title": [
                        { "type": "text", "plain_text": "실험 기록" },
                        { "type": "text", "plain_text": " (2)" }
                    ]
                }
            }
        }));

        assert_eq!(extract_title(&page), "실험 기록");
    }

    #[test]
    fn test_title_missing_properties() {
        assert_eq!(extract_title(&page(json!({}))), UNTITLED_PLACEHOLDER);
    }

    #[test]
    fn test_title_empty_list() {
        let page = page(json!({
            "properties": { "Name": { "type": "title", "title": [] } }
        }));

        assert_eq!(extract_title(&page), UNTITLED_PLACEHOLDER);
    }

    #[test]
    fn test_title_no_title_property() {
        let page = page(json!({
            "properties": {
                "Notes": { "type": "rich_text", "rich_text": [{ "plain_text": "body" }] }
            }
        }));

        assert_eq!(extract_title(&page), UNTITLED_PLACEHOLDER);
    }

    #[test]
    fn test_title_span_without_plain_text() {
        let page = page(json!({
            "properties": { "Name": { "type": "title", "title": [{ "type": "text" }] } }
        }));

        assert_eq!(extract_title(&page), UNTITLED_PLACEHOLDER);
    }

    #[test]
    fn test_editor_id() {
        let page = page(json!({ "last_edited_by": { "object": "user", "id": "user-9" } }));
        assert_eq!(extract_editor_id(&page), Some("user-9"));
    }

    #[test]
    fn test_editor_id_missing() {
        assert_eq!(extract_editor_id(&page(json!({}))), None);
    }
}
