pub mod author;
pub mod book;
pub mod book_genres;
pub mod book_instance;
pub mod genre;

use chrono::NaiveDate;

/// Dates live in the store as `YYYY-MM-DD` text. A stored value that no
/// longer parses surfaces as absent, same policy as a dangling reference.
pub fn parse_stored_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

pub fn store_date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format("%Y-%m-%d").to_string())
}
