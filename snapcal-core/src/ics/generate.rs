//! ICS file generation.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use uuid::Uuid;

use crate::error::{SnapcalError, SnapcalResult, TimeField};
use crate::event::CalendarEvent;
use crate::ics::escape::escape_text;
use crate::ics::line::LineWriter;
use crate::ics::options::{EncodeOptions, EndPolicy, EscapePolicy, InvalidEventPolicy, UidStrategy};
use crate::time::{format_utc, parse_timestamp};

/// A generated calendar document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsDocument {
    text: String,
    event_count: usize,
    skipped: Vec<SkippedEvent>,
}

/// An input event left out of the document under [`InvalidEventPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEvent {
    /// Position in the input sequence
    pub index: usize,
    pub title: String,
    pub reason: String,
}

impl IcsDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Number of VEVENT blocks written.
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    pub fn skipped(&self) -> &[SkippedEvent] {
        &self.skipped
    }
}

impl fmt::Display for IcsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Encode events into a VCALENDAR document.
///
/// `now` is written as DTSTAMP and seeds the timestamp UIDs, so the output
/// depends only on the arguments. Events keep their input order. An empty
/// slice still yields a valid calendar with no VEVENT blocks.
///
/// # Errors
///
/// With [`InvalidEventPolicy::Abort`], returns
/// [`SnapcalError::InvalidTimestamp`] for the first unparseable start or end,
/// or [`SnapcalError::EndBeforeStart`] under [`EndPolicy::Reject`]. With
/// `Skip` those events are left out and listed in [`IcsDocument::skipped`].
pub fn encode(
    events: &[CalendarEvent],
    now: DateTime<Utc>,
    options: &EncodeOptions,
) -> SnapcalResult<IcsDocument> {
    let mut w = LineWriter::new(options.line_ending);
    w.begin("VCALENDAR");
    w.property("VERSION", "2.0");
    w.property("PRODID", &options.product_id());

    let dtstamp = format_utc(&now);
    let mut event_count = 0;
    let mut skipped = Vec::new();

    for (index, event) in events.iter().enumerate() {
        let (start, end) = match resolve_times(event, options) {
            Ok(times) => times,
            Err(e) => match options.invalid_events {
                InvalidEventPolicy::Abort => return Err(e),
                InvalidEventPolicy::Skip => {
                    warn!("Skipping event {} (\"{}\"): {}", index, event.title, e);
                    skipped.push(SkippedEvent {
                        index,
                        title: event.title.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            },
        };

        w.begin("VEVENT");
        w.property("UID", &event_uid(event, index, &now, &start, &end, options));
        w.property("DTSTAMP", &dtstamp);
        w.property("DTSTART", &format_utc(&start));
        w.property("DTEND", &format_utc(&end));
        w.property("SUMMARY", &text_value(&event.title, options.escape));

        if let Some(location) = event.location() {
            w.property("LOCATION", &text_value(location, options.escape));
        }
        if let Some(description) = event.description() {
            w.property("DESCRIPTION", &text_value(description, options.escape));
        }

        w.end("VEVENT");
        event_count += 1;
    }

    w.end("VCALENDAR");

    debug!(
        "Encoded {} event(s), skipped {}",
        event_count,
        skipped.len()
    );

    Ok(IcsDocument {
        text: w.finish(),
        event_count,
        skipped,
    })
}

/// Parse start/end and apply the end-before-start policy.
fn resolve_times(
    event: &CalendarEvent,
    options: &EncodeOptions,
) -> SnapcalResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = parse_timestamp(&event.start, &options.zone).ok_or_else(|| {
        SnapcalError::InvalidTimestamp {
            field: TimeField::Start,
            value: event.start.clone(),
        }
    })?;
    let end = parse_timestamp(&event.end, &options.zone).ok_or_else(|| {
        SnapcalError::InvalidTimestamp {
            field: TimeField::End,
            value: event.end.clone(),
        }
    })?;

    if end >= start {
        return Ok((start, end));
    }

    match options.end_before_start {
        EndPolicy::Allow => Ok((start, end)),
        EndPolicy::Clamp => Ok((start, start)),
        EndPolicy::Reject => Err(SnapcalError::EndBeforeStart {
            title: event.title.clone(),
        }),
    }
}

fn event_uid(
    event: &CalendarEvent,
    index: usize,
    now: &DateTime<Utc>,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
    options: &EncodeOptions,
) -> String {
    match options.uid {
        UidStrategy::Timestamp => format!(
            "{}-{}@{}",
            now.timestamp_millis(),
            index,
            options.uid_namespace
        ),
        UidStrategy::ContentHash => {
            let key = format!(
                "{}\u{1f}{}\u{1f}{}",
                event.title,
                format_utc(start),
                format_utc(end)
            );
            let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes());
            format!("{}@{}", id, options.uid_namespace)
        }
    }
}

fn text_value(value: &str, policy: EscapePolicy) -> Cow<'_, str> {
    match policy {
        EscapePolicy::Rfc5545 => Cow::Owned(escape_text(value)),
        EscapePolicy::Verbatim => Cow::Borrowed(value),
    }
}
