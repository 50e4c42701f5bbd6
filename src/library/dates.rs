//! Release date normalization.
//!
//! The scraper copies dates verbatim from the source site, which means the
//! `soonOut.date` field is usually `DD/MM/YYYY` but may also be ISO or
//! something else entirely. Only the two known patterns get an ISO form;
//! anything else is parsed on a best-effort basis for sorting only.
//!
//! Fallback grammar, tried in order:
//! - RFC 3339 (`2026-03-15T10:00:00+09:00`)
//! - RFC 2822 (`Sun, 15 Mar 2026 10:00:00 +0000`)
//! - `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS`, local time
//! - `YYYY/MM/DD`, local midnight
//! - `D Month YYYY` with English month names, local midnight
//!
//! Nothing in here consults the system locale.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// `YYYY-MM-DD`, exactly.
static ISO_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("Invalid ISO_DATE_REGEX")
});

/// `DD/MM/YYYY`, exactly.
static DAY_FIRST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").expect("Invalid DAY_FIRST_REGEX")
});

const FALLBACK_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

const FALLBACK_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%d %B %Y"];

/// Result of normalizing a raw date string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDate {
    /// `YYYY-MM-DD` form, only for inputs matching one of the two known patterns.
    pub iso: Option<String>,
    /// The parsed instant, if the input resolves to a real date.
    pub instant: Option<DateTime<Local>>,
}

/// Normalizes a raw release date.
///
/// An input matching `YYYY-MM-DD` or `DD/MM/YYYY` always gets an ISO form,
/// even when the calendar date is invalid (e.g. month 13); in that case the
/// instant is absent.
pub fn normalize_date(input: &str) -> NormalizedDate {
    if let Some(caps) = ISO_DATE_REGEX.captures(input) {
        return NormalizedDate {
            iso: Some(input.to_string()),
            instant: calendar_midnight(&caps[1], &caps[2], &caps[3]),
        };
    }

    if let Some(caps) = DAY_FIRST_REGEX.captures(input) {
        let (day, month, year) = (&caps[1], &caps[2], &caps[3]);
        return NormalizedDate {
            iso: Some(format!("{}-{}-{}", year, month, day)),
            instant: calendar_midnight(year, month, day),
        };
    }

    NormalizedDate {
        iso: None,
        instant: parse_fallback(input),
    }
}

/// Local midnight of a calendar date given as digit strings.
fn calendar_midnight(year: &str, month: &str, day: &str) -> Option<DateTime<Local>> {
    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    local_midnight(date)
}

/// Start of the given day in the local timezone.
///
/// When midnight falls in a DST gap there is no such instant and this
/// returns `None`; when it is ambiguous the earlier instant wins.
pub fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    date.and_hms_opt(0, 0, 0)?
        .and_local_timezone(Local)
        .earliest()
}

fn parse_fallback(input: &str) -> Option<DateTime<Local>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Local));
    }

    for format in FALLBACK_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return naive.and_local_timezone(Local).earliest();
        }
    }

    for format in FALLBACK_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return local_midnight(date);
        }
    }

    None
}
