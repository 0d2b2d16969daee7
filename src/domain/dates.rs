use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a book date string into a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps. Time-of-day and offsets are discarded: a book finished at
/// `2024-01-31T23:30:00-05:00` counts toward January.
pub fn parse_book_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

/// Inclusive day count between two dates, floored at one day.
///
/// Finishing on the start day counts as one day; a completion date before
/// the start date also collapses to one day.
pub fn inclusive_reading_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = end.signed_duration_since(start).num_days() + 1;
    days.clamp(1, i64::from(u32::MAX)) as u32
}
