//! Prior-day time window in a fixed civil timezone.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{DigestError, Result};
use crate::notion::Page;

/// Offset of the civil timezone used for day boundaries (Asia/Seoul, no DST).
pub const CIVIL_OFFSET_SECS: i32 = 9 * 3600;

/// Label printed next to localized timestamps.
pub const CIVIL_TZ_LABEL: &str = "KST";

/// Asia/Seoul as a fixed offset.
pub const CIVIL_TIMEZONE: FixedOffset = match FixedOffset::east_opt(CIVIL_OFFSET_SECS) {
    Some(tz) => tz,
    None => panic!("civil offset out of range"),
};

/// The fixed civil timezone.
#[must_use]
pub const fn civil_timezone() -> FixedOffset {
    CIVIL_TIMEZONE
}

/// Parse a `YYYYMMDD` reference date.
pub fn parse_reference_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DigestError::InvalidReferenceDate(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map_err(|_| DigestError::InvalidReferenceDate(raw.to_string()))
}

/// Civil midnight of the reference date, or of today's civil date at `now`.
#[must_use]
pub fn today_start(
    reference: Option<NaiveDate>,
    tz: FixedOffset,
    now: DateTime<Utc>,
) -> DateTime<FixedOffset> {
    let date = reference.unwrap_or_else(|| now.with_timezone(&tz).date_naive());
    midnight(date, tz)
}

fn midnight(date: NaiveDate, tz: FixedOffset) -> DateTime<FixedOffset> {
    // Fixed offsets have no gaps or folds: shift to UTC by hand and convert back.
    let offset = Duration::seconds(i64::from(tz.local_minus_utc()));
    tz.from_utc_datetime(&(date.and_time(NaiveTime::MIN) - offset))
}

/// Half-open interval `[start, end)` one civil day long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// The day before `today_start`.
    #[must_use]
    pub fn yesterday(today_start: DateTime<FixedOffset>) -> Self {
        Self {
            start: today_start - Duration::days(1),
            end: today_start,
        }
    }

    /// Window for the day before the reference date (or before today at `now`).
    #[must_use]
    pub fn for_reference(
        reference: Option<NaiveDate>,
        tz: FixedOffset,
        now: DateTime<Utc>,
    ) -> Self {
        Self::yesterday(today_start(reference, tz, now))
    }

    /// Inclusive start.
    #[must_use]
    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// Exclusive end.
    #[must_use]
    pub const fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Timezone the window was computed in.
    #[must_use]
    pub fn timezone(&self) -> FixedOffset {
        *self.start.offset()
    }

    /// Whether `instant` falls inside the window.
    #[must_use]
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let instant = instant.with_timezone(&self.timezone());
        self.start <= instant && instant < self.end
    }

    /// Civil date of the window, `YYYY-MM-DD`.
    #[must_use]
    pub fn civil_date(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// Short date for email subjects, `M/D`.
    #[must_use]
    pub fn subject_label(&self) -> String {
        self.start.format("%-m/%-d").to_string()
    }
}

/// A page selected by the window, with its edit time in civil time.
#[derive(Debug, Clone)]
pub struct SelectedPage<'a> {
    /// The page.
    pub page: &'a Page,
    /// Last edit time converted to the window's timezone.
    pub edited_at: DateTime<FixedOffset>,
}

/// Keep pages last edited inside `window`, in input order.
///
/// Pages with an unparseable timestamp are skipped.
#[must_use]
pub fn select_in_window<'a>(pages: &'a [Page], window: &TimeWindow) -> Vec<SelectedPage<'a>> {
    let tz = window.timezone();

    pages
        .iter()
        .filter_map(|page| match page.edited_at() {
            Ok(edited) => Some(SelectedPage {
                page,
                edited_at: edited.with_timezone(&tz),
            }),
            Err(e) => {
                tracing::warn!(
                    id = %page.id,
                    last_edited_time = %page.last_edited_time,
                    error = %e,
                    "Skipping page with invalid timestamp"
                );
                None
            }
        })
        .filter(|selected| window.contains(&selected.edited_at))
        .collect()
}

/// Keep pages last edited on the civil day before the reference date.
#[must_use]
pub fn select_yesterday<'a>(
    pages: &'a [Page],
    reference: Option<NaiveDate>,
    tz: FixedOffset,
    now: DateTime<Utc>,
) -> Vec<SelectedPage<'a>> {
    select_in_window(pages, &TimeWindow::for_reference(reference, tz, now))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str, ts: &str) -> Page {
        Page {
            id: id.to_string(),
            url: format!("https://www.notion.so/{id}"),
            last_edited_time: ts.to_string(),
            last_edited_by: None,
            properties: None,
        }
    }

    fn utc(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    }

    fn date(raw: &str) -> NaiveDate {
        parse_reference_date(raw).unwrap()
    }

    #[test]
    fn test_parse_reference_date() {
        assert_eq!(date("20251217"), NaiveDate::from_ymd_opt(2025, 12, 17).unwrap());
        assert!(parse_reference_date("2025-12-17").is_err());
        assert!(parse_reference_date("2025121").is_err());
        assert!(parse_reference_date("20251332").is_err());
        assert!(parse_reference_date("2025121a").is_err());
    }

    #[test]
    fn test_today_start_reference_is_civil_midnight() {
        let tz = civil_timezone();
        let start = today_start(Some(date("20251217")), tz, utc("2030-01-01T00:00:00Z"));

        assert_eq!(start.to_rfc3339(), "2025-12-17T00:00:00+09:00");
        assert_eq!(start.with_timezone(&Utc), utc("2025-12-16T15:00:00Z"));
    }

    #[test]
    fn test_civil_timezone_is_kst() {
        assert_eq!(civil_timezone().local_minus_utc(), 9 * 3600);
        assert_eq!(civil_timezone().to_string(), "+09:00");
    }

    #[test]
    fn test_today_start_other_zone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let start = today_start(Some(date("20251217")), tz, utc("2030-01-01T00:00:00Z"));

        assert_eq!(start.to_rfc3339(), "2025-12-17T00:00:00-05:00");
    }

    #[test]
    fn test_today_start_without_reference_uses_civil_date() {
        let tz = civil_timezone();
        // 16:00 UTC is already 01:00 the next day in KST.
        let start = today_start(None, tz, utc("2025-12-16T16:00:00Z"));
        assert_eq!(start.to_rfc3339(), "2025-12-17T00:00:00+09:00");

        let start = today_start(None, tz, utc("2025-12-16T14:59:59Z"));
        assert_eq!(start.to_rfc3339(), "2025-12-16T00:00:00+09:00");
    }

    #[test]
    fn test_window_bounds() {
        let tz = civil_timezone();
        let window = TimeWindow::for_reference(Some(date("20251217")), tz, Utc::now());

        assert_eq!(window.start().to_rfc3339(), "2025-12-16T00:00:00+09:00");
        assert_eq!(window.end().to_rfc3339(), "2025-12-17T00:00:00+09:00");
        assert_eq!(window.end() - window.start(), Duration::hours(24));
        assert_eq!(window.civil_date(), "2025-12-16");
        assert_eq!(window.subject_label(), "12/16");
    }

    #[test]
    fn test_window_inclusive_start_exclusive_end() {
        let tz = civil_timezone();
        let window = TimeWindow::for_reference(Some(date("20251217")), tz, Utc::now());

        assert!(window.contains(&utc("2025-12-15T15:00:00Z")));
        assert!(window.contains(&utc("2025-12-16T14:59:59Z")));
        assert!(!window.contains(&utc("2025-12-16T15:00:00Z")));
        assert!(!window.contains(&utc("2025-12-15T14:59:59Z")));
    }

    #[test]
    fn test_select_yesterday_preserves_order() {
        let pages = vec![
            page("late", "2025-12-16T14:59:59Z"),
            page("today", "2025-12-16T15:00:00Z"),
            page("mid", "2025-12-16T05:00:00Z"),
            page("first", "2025-12-15T15:00:00Z"),
            page("before", "2025-12-15T14:59:59.999Z"),
        ];

        let selected = select_yesterday(&pages, Some(date("20251217")), civil_timezone(), Utc::now());
        let ids: Vec<_> = selected.iter().map(|s| s.page.id.as_str()).collect();

        assert_eq!(ids, vec!["late", "mid", "first"]);
        assert_eq!(
            selected[0].edited_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2025-12-16 23:59:59"
        );
    }

    #[test]
    fn test_select_converts_utc_into_civil_day() {
        // 23:59:59 UTC on the 16th is 08:59:59 KST on the 17th.
        let pages = vec![page("p", "2025-12-16T23:59:59Z")];

        assert!(select_yesterday(&pages, Some(date("20251217")), civil_timezone(), Utc::now()).is_empty());
        assert_eq!(
            select_yesterday(&pages, Some(date("20251218")), civil_timezone(), Utc::now()).len(),
            1
        );
    }

    #[test]
    fn test_select_skips_invalid_timestamp() {
        let pages = vec![page("bad", "not a time"), page("good", "2025-12-16T01:00:00Z")];

        let selected = select_yesterday(&pages, Some(date("20251217")), civil_timezone(), Utc::now());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].page.id, "good");
    }
}
