//! Lenient timestamp parsing shared by the loader and the API layer.
//!
//! Dataset files and query strings use a mix of layouts. Every accepted
//! layout resolves to an [`OffsetDateTime`]; values without an explicit
//! offset are interpreted as UTC, and bare dates resolve to midnight.

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::error::{ParseError, ParseResult};

// `padding:none` accepts one or two digits, so both `2024-01-05` and
// `2024-1-5` parse.
const DATETIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!(
        "[year]-[month padding:none]-[day padding:none]T[hour padding:none]:[minute padding:none]:[second padding:none].[subsecond]"
    ),
    format_description!(
        "[year]-[month padding:none]-[day padding:none]T[hour padding:none]:[minute padding:none]:[second padding:none]"
    ),
    format_description!(
        "[year]-[month padding:none]-[day padding:none]T[hour padding:none]:[minute padding:none]"
    ),
    format_description!(
        "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute padding:none]:[second padding:none].[subsecond]"
    ),
    format_description!(
        "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute padding:none]:[second padding:none]"
    ),
    format_description!(
        "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute padding:none]"
    ),
];

const DATE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
];

/// Parse a date or date-time string.
///
/// Accepted layouts, tried in order:
///
/// - RFC 3339 with offset: `2024-01-15T10:30:00Z`, `2024-01-15T10:30:00+02:00`
/// - Naive date-time with `T` or space separator, optional seconds and
///   fractional seconds: `2024-01-15 10:30:00`, `2024-01-15T10:30`
/// - Bare date: `2024-01-15`, `2024/01/15` (midnight UTC)
///
/// Outside RFC 3339, month, day and time fields may omit their leading zero
/// (`2024-1-5 9:05`).
///
/// Input is not trimmed; surrounding whitespace makes the value invalid.
///
/// # Examples
///
/// ```
/// use savings_types::parse_datetime;
/// use time::macros::datetime;
///
/// assert_eq!(parse_datetime("2024-01-05").unwrap(), datetime!(2024-01-05 0:00 UTC));
/// assert_eq!(
///     parse_datetime("2024-01-05 13:45:00").unwrap(),
///     datetime!(2024-01-05 13:45 UTC)
/// );
/// assert!(parse_datetime("yesterday").is_err());
/// ```
pub fn parse_datetime(s: &str) -> ParseResult<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(dt);
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = PrimitiveDateTime::parse(s, *format) {
            return Ok(dt.assume_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = Date::parse(s, *format) {
            return Ok(date.midnight().assume_utc());
        }
    }

    Err(ParseError::InvalidDate(s.to_string()))
}
