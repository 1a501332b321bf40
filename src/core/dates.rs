use crate::utils::error::{DocGenError, Result};
use chrono::{DateTime, Datelike, NaiveDate};

/// Bulgarian month names, as the trip order template expects them in the
/// long date form.
const MONTH_NAMES: [&str; 12] = [
    "януари",
    "февруари",
    "март",
    "април",
    "май",
    "юни",
    "юли",
    "август",
    "септември",
    "октомври",
    "ноември",
    "декември",
];

/// Parses a stop or creation date as either a plain `YYYY-MM-DD` or a full
/// RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|e| DocGenError::MalformedInput {
            message: format!("unparseable date {:?}: {}", value, e),
        })
}

/// `dd.mm.yyyy`, the short form used for the trip's from/to dates.
pub fn format_short(date: NaiveDate) -> String {
    format!("{:02}.{:02}.{}", date.day(), date.month(), date.year())
}

/// `dd <month name> yyyy`, the long form used for the creation date.
pub fn format_long(date: NaiveDate) -> String {
    let month = MONTH_NAMES[date.month0() as usize];
    format!("{:02} {} {}", date.day(), month, date.year())
}
