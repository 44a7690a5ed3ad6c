//! Time helpers
//!
//! Date-string parsing happens at the API handler layer; repository
//! functions only receive pre-formatted ISO-8601 bounds.

use chrono::NaiveDate;

use super::{AppError, AppResult};

/// Parse a date string (`YYYY-MM-DD`)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// Start of day as an ISO-8601 timestamp string (UTC).
///
/// Comparable lexicographically against stored `created_at` values,
/// which use the same fixed-width format.
pub fn day_start_iso(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

/// End of day, exclusive: next day's 00:00:00. Callers use `< end`.
pub fn day_end_iso(date: NaiveDate) -> String {
    let next = date.succ_opt().unwrap_or(date);
    format!("{}T00:00:00.000Z", next.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_bracket_timestamps() {
        let date = parse_date("2026-03-15").unwrap();
        let start = day_start_iso(date);
        let end = day_end_iso(date);
        let inside = "2026-03-15T13:45:00.120Z".to_string();
        assert!(start <= inside && inside < end);
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_date("15/03/2026").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }
}
