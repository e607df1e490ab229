//! Time related utils.
//!
//! Signing only ever renders a UTC instant as the compact ISO 8601 timestamp
//! used in `x-amz-date`. Its first 8 digits are the credential scope date.
//! Everything loosely formatted goes through [`normalize_timestamp`] first.

use chrono::format::ParseResult;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;

use crate::Error;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime with current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse a compact ISO8601 timestamp: `20220313T072004Z`
pub fn parse_iso8601(s: &str) -> ParseResult<DateTime> {
    NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ").map(|t| t.and_utc())
}

/// Parse a loosely formatted timestamp into a UTC instant.
///
/// Accepted inputs, tried in order:
///
/// - compact AWS form: `20111015T080000Z`
/// - RFC 3339: `2015-10-15T08:00:00Z`, `2015-10-15T10:00:00.123+02:00`
/// - ISO 8601 without offset, taken as UTC: `2015-10-15T08:00:00`
/// - date only, taken as midnight UTC: `2015-10-15`
/// - RFC 2822 as used by the HTTP `Date` header: `Fri, 09 Sep 2011 23:36:00 GMT`
pub fn parse_timestamp(s: &str) -> crate::Result<DateTime> {
    let s = s.trim();

    if let Ok(t) = parse_iso8601(s) {
        return Ok(t);
    }
    if let Ok(t) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(t.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(t) = d.and_hms_opt(0, 0, 0) {
            return Ok(t.and_utc());
        }
    }
    if let Ok(t) = chrono::DateTime::parse_from_rfc2822(s) {
        return Ok(t.with_timezone(&Utc));
    }

    Err(Error::date_invalid(format!(
        "Unacceptable datetime string: {s:?}"
    )))
}

/// Normalize a loosely formatted timestamp into `YYYYMMDDTHHMMSSZ`.
///
/// Fractional seconds are dropped.
pub fn normalize_timestamp(s: &str) -> crate::Result<String> {
    parse_timestamp(s).map(format_iso8601)
}
