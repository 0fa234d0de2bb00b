//! Timestamp parsing and ICS date-time formatting.
//!
//! Event times arrive as loosely ISO-8601 strings, usually without an
//! offset. Those are wall-clock times in a [`Zone`] and get converted to
//! UTC before they are written out.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::SnapcalError;

/// Accepted wall-clock forms, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
];

/// Output format for DTSTAMP/DTSTART/DTEND values.
const ICS_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Format used when writing wall-clock times back out as strings.
const WALL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Time zone used to interpret times that carry no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// The system's local time zone.
    #[default]
    Local,
    Utc,
    /// A named IANA zone, e.g. `Europe/Berlin`.
    Named(Tz),
}

impl Zone {
    /// Convert a wall-clock time in this zone to UTC.
    ///
    /// Times that fall into a DST gap don't exist and return `None`.
    /// Ambiguous times (DST overlap) resolve to the earlier instant.
    pub fn to_utc(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Local => earliest_utc(Local.from_local_datetime(&naive)),
            Zone::Utc => Some(naive.and_utc()),
            Zone::Named(tz) => earliest_utc(tz.from_local_datetime(&naive)),
        }
    }
}

fn earliest_utc<T: TimeZone>(result: LocalResult<DateTime<T>>) -> Option<DateTime<Utc>> {
    result.earliest().map(|dt| dt.with_timezone(&Utc))
}

impl FromStr for Zone {
    type Err = SnapcalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "local" | "Local" => Ok(Zone::Local),
            "utc" | "UTC" | "Z" => Ok(Zone::Utc),
            name => name
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|_| SnapcalError::Config(format!("Unknown time zone '{}'", name))),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Utc => write!(f, "UTC"),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

/// Parse an event time into a UTC instant.
///
/// Strings with an explicit offset (`Z`, `+02:00`) keep their own offset.
/// Everything else is a wall-clock time in `zone`. A bare date means
/// midnight.
pub fn parse_timestamp(input: &str, zone: &Zone) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(utc) = s.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        return parse_naive(utc).map(|naive| naive.and_utc());
    }

    zone.to_utc(parse_naive(s)?)
}

/// Parse a wall-clock time without any offset information.
pub fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Render a UTC instant as `YYYYMMDDTHHMMSSZ`.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format(ICS_UTC_FORMAT).to_string()
}

/// Shift an event time by `by`, keeping its form.
///
/// Wall-clock inputs stay wall-clock (no zone lookup), offset inputs stay
/// offset. Returns `None` when the input can't be parsed.
pub fn shift_time(input: &str, by: Duration) -> Option<String> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some((dt + by).to_rfc3339());
    }

    parse_naive(s).map(|naive| (naive + by).format(WALL_TIME_FORMAT).to_string())
}
