//! Date formats
//!
//! The API speaks ISO dates (`YYYY-MM-DD`). The exchange portal's date
//! filter expects `MM/DD/YYYY`.

use chrono::NaiveDate;
use thiserror::Error;

const API_DATE_FORMAT: &str = "%Y-%m-%d";
const PORTAL_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Error)]
#[error("invalid date '{input}', expected YYYY-MM-DD")]
pub struct DateError {
    pub input: String,
}

/// Parse a close date given as `YYYY-MM-DD`
///
/// Surrounding whitespace is rejected rather than trimmed.
pub fn parse_close_date(input: &str) -> Result<NaiveDate, DateError> {
    let invalid = || DateError {
        input: input.to_string(),
    };

    if input.trim() != input {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(input, API_DATE_FORMAT).map_err(|_| invalid())
}

/// Format a date the way the portal's date input expects it
pub fn to_portal_date(date: NaiveDate) -> String {
    date.format(PORTAL_DATE_FORMAT).to_string()
}
