//! Date coercion for front-matter values

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use serde_yaml::Value;

lazy_static! {
    /// ISO `YYYY` and `YYYY-MM`
    static ref PARTIAL_ISO_DATE: Regex =
        Regex::new(r"^(\d{4})(?:-(\d{2}))?$").expect("valid partial date regex");
}

/// Date-times without an offset, read in the site timezone
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Offset-carrying forms that are not strict RFC 3339
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

/// `Z`-suffixed forms that RFC 3339 rejects for lacking seconds
const ZULU_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%MZ"];

/// Calendar dates other than ISO `YYYY-MM-DD`, midnight in the site timezone
const HUMAN_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%b %d %Y", "%b %d, %Y", "%d %b %Y"];

/// Coerce a loosely-typed front-matter value into a UTC instant.
///
/// Strings are parsed; integers count milliseconds since the Unix epoch.
/// Returns `None` for anything that does not denote a date.
pub fn coerce_date(value: &Value, tz: Tz) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s, tz),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Parse a date string in various formats
pub fn parse_date_str(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in ZULU_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    // ISO date-only strings are UTC midnight, not local midnight
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if let Some(d) = parse_partial_iso(s) {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(dt, tz);
        }
    }

    for fmt in HUMAN_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return localize(d.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    None
}

/// First day of an ISO year or year-month
fn parse_partial_iso(s: &str) -> Option<NaiveDate> {
    let caps = PARTIAL_ISO_DATE.captures(s)?;
    let year = caps[1].parse().ok()?;
    let month = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn localize(dt: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&dt)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
