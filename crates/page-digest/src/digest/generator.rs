//! Digest content generator.
//!
//! Builds the email body from the pages selected for the day.

use chrono::{DateTime, FixedOffset};
use std::fmt::Write;

const SPACES_2: &str = "&nbsp;&nbsp;";
const SPACES_8: &str = "&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;";

/// Separator placed between entry fragments.
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// One line item of the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    /// 1-based position in the digest.
    pub ordinal: usize,
    /// Page title.
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Last editor, if known.
    pub editor_id: Option<String>,
    /// Last edit time in civil time.
    pub edited_at: DateTime<FixedOffset>,
}

/// Generates digest email content.
pub struct DigestGenerator {
    tz_label: String,
}

impl DigestGenerator {
    /// Create a generator that labels timestamps with `tz_label` (e.g. `KST`).
    #[must_use]
    pub fn new(tz_label: impl Into<String>) -> Self {
        Self {
            tz_label: tz_label.into(),
        }
    }

    /// Email subject for the given `M/D` label.
    #[must_use]
    pub fn subject(date_label: &str) -> String {
        format!("연구노트 업데이트 목록 ({date_label})")
    }

    /// HTML fragment for a single entry.
    #[must_use]
    pub fn format_entry(&self, entry: &DigestEntry) -> String {
        format!(
            "<b>{ordinal}. {SPACES_2}{title}</b> <br> {SPACES_8}{url} <br>{SPACES_8} ({timestamp} ({label}))<br><br>",
            ordinal = entry.ordinal,
            title = html_escape(&entry.title),
            url = html_escape(&entry.url),
            timestamp = entry.edited_at.format("%Y-%m-%d %H:%M:%S"),
            label = self.tz_label,
        )
    }

    /// Join entry fragments into the HTML body. `None` when there is nothing to send.
    #[must_use]
    pub fn generate_html(&self, entries: &[DigestEntry]) -> Option<String> {
        if entries.is_empty() {
            return None;
        }

        Some(
            entries
                .iter()
                .map(|entry| self.format_entry(entry))
                .collect::<Vec<_>>()
                .join(ENTRY_SEPARATOR),
        )
    }

    /// Plain-text alternative of the HTML body.
    #[must_use]
    pub fn generate_text(&self, entries: &[DigestEntry]) -> Option<String> {
        if entries.is_empty() {
            return None;
        }

        let mut text = String::new();
        for entry in entries {
            let _ = write!(
                text,
                "{ordinal}. {title}\n        {url}\n        ({timestamp} ({label}))\n\n",
                ordinal = entry.ordinal,
                title = entry.title,
                url = entry.url,
                timestamp = entry.edited_at.format("%Y-%m-%d %H:%M:%S"),
                label = self.tz_label,
            );
        }

        Some(text)
    }
}

/// Simple HTML escaping for user content.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
