//! Date normalization for loosely formatted `error_date` input.
//!
//! Upstream sources (manual entry, spreadsheet exports) mix ISO dates with
//! day-first dates. Three encodings are accepted, tried in a fixed order, and
//! everything else is rejected.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::DomainError;

/// Human-readable names of the accepted encodings, in priority order.
pub const ACCEPTED_DATE_FORMATS: [&str; 3] = ["YYYY-MM-DD", "DD-MM-YYYY", "DD/MM/YYYY"];

/// `strftime` pattern, field separator and year field position, matching
/// [`ACCEPTED_DATE_FORMATS`] index for index.
const DATE_PATTERNS: [(&str, char, usize); 3] = [
    ("%Y-%m-%d", '-', 0),
    ("%d-%m-%Y", '-', 2),
    ("%d/%m/%Y", '/', 2),
];

/// Only the leading date portion of the input is considered.
const DATE_PREFIX_LEN: usize = 10;

/// Parse a textual date in any accepted encoding.
///
/// Surrounding whitespace is stripped and anything past the first ten
/// characters (a time component, typically) is ignored.
pub fn parse_date_any(input: &str) -> Result<NaiveDate, DomainError> {
    let trimmed = input.trim();
    let prefix = match trimmed.char_indices().nth(DATE_PREFIX_LEN) {
        Some((end, _)) => &trimmed[..end],
        None => trimmed,
    };

    DATE_PATTERNS
        .iter()
        .filter(|(_, separator, year_at)| has_full_year(prefix, *separator, *year_at))
        .find_map(|(pattern, _, _)| NaiveDate::parse_from_str(prefix, pattern).ok())
        .ok_or(DomainError::DateFormat)
}

/// `%Y` alone takes any number of digits; the year must be exactly four.
fn has_full_year(prefix: &str, separator: char, year_at: usize) -> bool {
    prefix
        .split(separator)
        .nth(year_at)
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse a JSON value as a date, rendering non-string scalars as text first.
pub fn parse_date_value(value: &Value) -> Result<NaiveDate, DomainError> {
    match value {
        Value::String(s) => parse_date_any(s),
        other => parse_date_any(&other.to_string()),
    }
}
