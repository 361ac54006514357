//! Notion API data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A workspace page as returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Public page URL.
    #[serde(default)]
    pub url: String,
    /// Last edit time (ISO-8601, UTC).
    pub last_edited_time: String,
    /// User who last edited the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<UserRef>,
    /// Page properties keyed by property name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertyValue>>,
}

impl Page {
    /// Parse the last edit time.
    pub fn edited_at(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.last_edited_time).map(|dt| dt.with_timezone(&Utc))
    }
}

/// Reference to a user by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User ID.
    pub id: String,
}

/// A single page property value.
///
/// Only title properties are interpreted; other property kinds keep their
/// declared type and nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Declared property type (`title`, `rich_text`, `date`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Title spans, present for title properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Vec<RichText>>,
}

impl PropertyValue {
    /// Whether this property is declared as the page title.
    #[must_use]
    pub fn is_title(&self) -> bool {
        self.kind.as_deref() == Some("title")
    }
}

/// A rich-text span.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RichText {
    /// Unformatted text of the span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
}

/// Response body of `POST /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Matching pages, most recently edited first.
    #[serde(default)]
    pub results: Vec<Page>,
    /// Whether more results exist past this page of results.
    #[serde(default)]
    pub has_more: bool,
}

/// A workspace member or bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceUser {
    /// User ID.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `person` or `bot`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Response body of `GET /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    /// Users in the workspace.
    #[serde(default)]
    pub results: Vec<WorkspaceUser>,
}

/// An entry to be written into the tracking database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRecord {
    /// Page title.
    pub title: String,
    /// Source page ID, written as a page mention.
    pub page_id: String,
    /// Last editor, written into the people field.
    pub editor_id: Option<String>,
    /// Civil date (`YYYY-MM-DD`).
    pub date: String,
}
