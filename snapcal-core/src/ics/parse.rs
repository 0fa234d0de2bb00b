//! ICS file parsing using the icalendar crate's parser.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use crate::error::{SnapcalError, SnapcalResult};
use crate::event::CalendarEvent;

/// A VEVENT read back from an ICS document, with times normalized to UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    pub uid: Option<String>,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub stamp: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl DecodedEvent {
    /// Rebuild the encoder input. Times come back as RFC 3339 UTC strings.
    pub fn into_calendar_event(self) -> CalendarEvent {
        CalendarEvent {
            title: self.summary,
            start: self.start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            end: self.end.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            location: self.location,
            description: self.description,
        }
    }
}

/// Parse every VEVENT in an ICS document, in document order.
///
/// Floating times and all-day dates are read as UTC. Times with a TZID
/// are converted through the IANA database.
///
/// # Errors
///
/// Returns [`SnapcalError::IcsParse`] if the document can't be read or an
/// event lacks a usable DTSTART or DTEND.
pub fn decode(content: &str) -> SnapcalResult<Vec<DecodedEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| SnapcalError::IcsParse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .enumerate()
        .map(|(index, vevent)| decode_event(index, vevent))
        .collect()
}

fn decode_event(index: usize, vevent: &Component<'_>) -> SnapcalResult<DecodedEvent> {
    let uid = vevent.find_prop("UID").map(|p| p.val.to_string());
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_default();

    let start = required_time(index, vevent, "DTSTART")?;
    let end = required_time(index, vevent, "DTEND")?;
    let stamp = vevent
        .find_prop("DTSTAMP")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .and_then(to_utc);

    let location = text_prop(vevent, "LOCATION");
    let description = text_prop(vevent, "DESCRIPTION");

    Ok(DecodedEvent {
        uid,
        summary,
        start,
        end,
        stamp,
        location,
        description,
    })
}

fn required_time(index: usize, vevent: &Component<'_>, name: &str) -> SnapcalResult<DateTime<Utc>> {
    let prop = vevent
        .find_prop(name)
        .ok_or_else(|| SnapcalError::IcsParse(format!("Event {} has no {}", index, name)))?;

    DatePerhapsTime::try_from(prop)
        .ok()
        .and_then(to_utc)
        .ok_or_else(|| {
            SnapcalError::IcsParse(format!(
                "Event {} has an unreadable {}: {}",
                index,
                name,
                prop.val
            ))
        })
}

/// Text value as unescaped by the parser; empty values read as absent.
fn text_prop(vevent: &Component<'_>, name: &str) -> Option<String> {
    vevent
        .find_prop(name)
        .map(|p| p.val.to_string())
        .filter(|v| !v.is_empty())
}

fn to_utc(dpt: DatePerhapsTime) -> Option<DateTime<Utc>> {
    match dpt {
        DatePerhapsTime::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => Some(dt),
            CalendarDateTime::Floating(naive) => Some(naive.and_utc()),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                let tz: Tz = tzid.parse().ok()?;
                date_time
                    .and_local_timezone(tz)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::{EncodeOptions, encode};
    use crate::time::Zone;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_decode_reads_every_event_in_order() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:a@test\r\n\
DTSTAMP:20250101T000000Z\r\n\
DTSTART:20250310T090000Z\r\n\
DTEND:20250310T103000Z\r\n\
SUMMARY:Midterm\r\n\
LOCATION:Hall B\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:b@test\r\n\
DTSTART:20250311T140000Z\r\n\
DTEND:20250311T150000Z\r\n\
SUMMARY:Office hours\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let events = decode(ics).expect("Should decode");
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].uid.as_deref(), Some("a@test"));
        assert_eq!(events[0].summary, "Midterm");
        assert_eq!(events[0].start, utc(2025, 3, 10, 9, 0));
        assert_eq!(events[0].end, utc(2025, 3, 10, 10, 30));
        assert_eq!(events[0].stamp, Some(utc(2025, 1, 1, 0, 0)));
        assert_eq!(events[0].location.as_deref(), Some("Hall B"));
        assert_eq!(events[0].description, None);

        assert_eq!(events[1].summary, "Office hours");
        assert_eq!(events[1].stamp, None);
    }

    #[test]
    fn test_decode_unescapes_text() {
        let ics = "BEGIN:VCALENDAR\n\
VERSION:2.0\n\
PRODID:-//test//EN\n\
BEGIN:VEVENT\n\
DTSTART:20250310T120000Z\n\
DTEND:20250310T130000Z\n\
SUMMARY:Lunch\\, then class\n\
DESCRIPTION:Bring:\\n- pencil\\; eraser\n\
END:VEVENT\n\
END:VCALENDAR\n";

        let events = decode(ics).expect("Should decode");
        assert_eq!(events[0].summary, "Lunch, then class");
        assert_eq!(events[0].description.as_deref(), Some("Bring:\n- pencil; eraser"));
    }

    #[test]
    fn test_decode_converts_tzid_times() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
DTSTART;TZID=America/New_York:20250310T090000\r\n\
DTEND;TZID=America/New_York:20250310T100000\r\n\
SUMMARY:Zoned\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let events = decode(ics).expect("Should decode");
        assert_eq!(events[0].start, utc(2025, 3, 10, 13, 0));
        assert_eq!(events[0].end, utc(2025, 3, 10, 14, 0));
    }

    #[test]
    fn test_decode_missing_dtend_is_an_error() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
DTSTART:20250310T090000Z\r\n\
SUMMARY:Open ended\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let err = decode(ics).unwrap_err();
        assert!(err.to_string().contains("DTEND"), "got {}", err);
    }

    #[test]
    fn test_decode_keeps_backslashes_in_text() {
        let now = utc(2025, 1, 1, 0, 0);
        let options = EncodeOptions::default().with_zone(Zone::Utc);
        let events = vec![
            CalendarEvent::new("C:\\temp, notes", "2025-03-10T09:00:00", "2025-03-10T10:00:00")
                .with_location("Room \\3; east")
                .with_description("path\\n is not a newline"),
        ];

        let doc = encode(&events, now, &options).unwrap();
        assert!(doc.as_str().contains("SUMMARY:C:\\\\temp\\, notes"));

        let decoded = decode(doc.as_str()).expect("Should decode");
        assert_eq!(decoded[0].summary, "C:\\temp, notes");
        assert_eq!(decoded[0].location.as_deref(), Some("Room \\3; east"));
        assert_eq!(decoded[0].description.as_deref(), Some("path\\n is not a newline"));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let now = utc(2025, 1, 1, 0, 0);
        let options = EncodeOptions::default().with_zone(Zone::Utc);
        let events = vec![
            CalendarEvent::new("Lunch, then class", "2025-03-10T12:00:00", "2025-03-10T13:00:00")
                .with_location("Cafe; 2nd floor")
                .with_description("Menu:\nsoup\\salad"),
            CalendarEvent::new("Midterm", "2025-03-10T09:00:00", "2025-03-10T10:30:00"),
            CalendarEvent::new("Essay due", "2025-03-14T23:59:00", "2025-03-15T00:00:00")
                .with_description("x".repeat(300)),
        ];

        let doc = encode(&events, now, &options).unwrap();
        let decoded = decode(doc.as_str()).expect("Should decode generated ICS");

        let rebuilt: Vec<CalendarEvent> = decoded
            .into_iter()
            .map(DecodedEvent::into_calendar_event)
            .collect();

        let expected: Vec<CalendarEvent> = vec![
            CalendarEvent::new("Lunch, then class", "2025-03-10T12:00:00Z", "2025-03-10T13:00:00Z")
                .with_location("Cafe; 2nd floor")
                .with_description("Menu:\nsoup\\salad"),
            CalendarEvent::new("Midterm", "2025-03-10T09:00:00Z", "2025-03-10T10:30:00Z"),
            CalendarEvent::new("Essay due", "2025-03-14T23:59:00Z", "2025-03-15T00:00:00Z")
                .with_description("x".repeat(300)),
        ];
        pretty_assertions::assert_eq!(rebuilt, expected);
    }

    #[test]
    fn test_decode_empty_calendar() {
        let doc = encode(&[], utc(2025, 1, 1, 0, 0), &EncodeOptions::default()).unwrap();
        let events = decode(doc.as_str()).expect("Should decode empty calendar");
        assert!(events.is_empty());
    }
}
