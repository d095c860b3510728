//! Display helpers shared by the storefront and back-office templates.

use chrono::{DateTime, Utc};

/// Keep the first `max` characters of `s`, appending `...` when anything
/// was cut.
///
/// Counts characters rather than bytes so Vietnamese text is never split
/// inside a code point.
///
/// # Example
///
/// ```
/// use shoop_core::text::truncate;
///
/// assert_eq!(truncate("Tượng Phật Di Lặc", 5), "Tượng...");
/// assert_eq!(truncate("ngắn", 10), "ngắn");
/// ```
#[must_use]
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", s.get(..cut).unwrap_or(s)),
        None => s.to_owned(),
    }
}

/// `dd/mm/YYYY`.
#[must_use]
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// `dd/mm/YYYY HH:MM`.
#[must_use]
pub fn format_datetime(at: &DateTime<Utc>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// Parse the text form templates receive back into a timestamp.
///
/// Accepts RFC 3339 and chrono's `Display` form for `DateTime<Utc>`
/// (`2026-01-31 08:05:00 UTC`).
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s.trim_end_matches(" UTC"), "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Vòng tay thạch anh", 8), "Vòng tay...");
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_date_formats() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_date(&at), "07/03/2026");
        assert_eq!(format_datetime(&at), "07/03/2026 09:05");
    }

    #[test]
    fn test_parse_timestamp_display_form() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(parse_timestamp(&at.to_string()), Some(at));
        assert_eq!(parse_timestamp(&at.to_rfc3339()), Some(at));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
