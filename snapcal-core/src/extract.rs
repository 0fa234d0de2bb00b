//! Turning model responses into events and recommendations.
//!
//! Hosted models rarely return bare JSON. Replies come wrapped in markdown
//! code fences or surrounded by prose, so the JSON payload is cut out
//! before deserializing.

use chrono::Duration;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SnapcalError, SnapcalResult};
use crate::event::CalendarEvent;
use crate::time::shift_time;

/// One suggested course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(alias = "title", alias = "name")]
    pub course: String,
    #[serde(default, alias = "why", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Event as the model writes it. Every field is optional so a single bad
/// entry doesn't sink the whole reply.
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default, alias = "summary", alias = "name")]
    title: Option<String>,
    #[serde(default, alias = "start_time", alias = "startTime")]
    start: Option<String>,
    #[serde(default, alias = "end_time", alias = "endTime")]
    end: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEvents {
    List(Vec<RawEvent>),
    Wrapped { events: Vec<RawEvent> },
    Single(RawEvent),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRecommendation {
    Plain(String),
    Full(Recommendation),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRecommendations {
    List(Vec<RawRecommendation>),
    Wrapped {
        recommendations: Vec<RawRecommendation>,
    },
}

/// Cut the JSON payload out of a model reply.
///
/// Takes the body of the first markdown code fence if there is one, then
/// the first `[` or `{` that opens a complete JSON value. Bracketed prose
/// before the payload is skipped.
pub fn clean_model_output(text: &str) -> Option<&str> {
    json_payload(text).and_then(Result::ok)
}

/// First complete JSON value in a reply. `None` when nothing opens a
/// value; the first parse error when something does but none parses.
fn json_payload(text: &str) -> Option<Result<&str, serde_json::Error>> {
    let body = strip_code_fence(text);
    let mut first_err = None;

    for (start, _) in body.char_indices().filter(|&(_, c)| c == '[' || c == '{') {
        let rest = &body[start..];
        let mut values = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        match values.next() {
            Some(Ok(_)) => return Some(Ok(&rest[..values.byte_offset()])),
            Some(Err(e)) => {
                first_err.get_or_insert(e);
            }
            None => {}
        }
    }

    first_err.map(Err)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after = &text[open + 3..];
    // Skip the language tag line ("```json")
    let body = match after.find('\n') {
        Some(newline) => &after[newline + 1..],
        None => after,
    };

    match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    }
}

/// Parse a model reply into events.
///
/// Accepts a JSON array, an object with an `events` array, or a single
/// event object. Entries without a title or start are dropped with a
/// warning. A missing end becomes `start + default_duration`; if the start
/// itself can't be read the end is set to the start so the encoder reports
/// the bad timestamp.
///
/// # Errors
///
/// [`SnapcalError::Extract`] if the reply contains no JSON,
/// [`SnapcalError::Json`] if the JSON doesn't have an event shape.
pub fn extract_events(text: &str, default_duration: Duration) -> SnapcalResult<Vec<CalendarEvent>> {
    let json = match json_payload(text) {
        Some(payload) => payload?,
        None => return Err(SnapcalError::Extract("no JSON found in model response".into())),
    };
    debug!("Extracted JSON payload ({} bytes)", json.len());

    let raw = match serde_json::from_str::<RawEvents>(json)? {
        RawEvents::List(events) | RawEvents::Wrapped { events } => events,
        RawEvents::Single(event) => vec![event],
    };

    let events = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| into_event(index, raw, default_duration))
        .collect();

    Ok(events)
}

fn into_event(index: usize, raw: RawEvent, default_duration: Duration) -> Option<CalendarEvent> {
    let title = raw.title.map(|t| t.trim().to_string()).unwrap_or_default();
    if title.is_empty() {
        warn!("Dropping extracted event {}: no title", index);
        return None;
    }

    let Some(start) = raw.start.filter(|s| !s.trim().is_empty()) else {
        warn!("Dropping extracted event {} (\"{}\"): no start time", index, title);
        return None;
    };

    let end = match raw.end.filter(|e| !e.trim().is_empty()) {
        Some(end) => end,
        None => shift_time(&start, default_duration).unwrap_or_else(|| start.clone()),
    };

    Some(CalendarEvent {
        title,
        start,
        end,
        location: raw.location,
        description: raw.description,
    })
}

/// Parse a model reply into course recommendations.
///
/// JSON replies (a list of strings or `{course, reason}` objects, bare or
/// under `recommendations`) are used as-is. Anything else is read as a
/// plain-text list, one course per line.
pub fn extract_recommendations(text: &str) -> Vec<Recommendation> {
    if let Some(json) = clean_model_output(text) {
        match serde_json::from_str::<RawRecommendations>(json) {
            Ok(RawRecommendations::List(items))
            | Ok(RawRecommendations::Wrapped {
                recommendations: items,
            }) => {
                return items
                    .into_iter()
                    .map(|item| match item {
                        RawRecommendation::Plain(course) => Recommendation {
                            course,
                            reason: None,
                        },
                        RawRecommendation::Full(rec) => rec,
                    })
                    .filter(|rec| !rec.course.trim().is_empty())
                    .collect();
            }
            Err(e) => debug!("Recommendation reply is not JSON ({}), reading as text", e),
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(|line| Recommendation {
            course: line.to_string(),
            reason: None,
        })
        .collect()
}

/// Strip `-`, `*`, `•` bullets and `1.` / `1)` numbering.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim_start_matches(&['-', '*', '•'][..]).trim_start();

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim_start();
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour() -> Duration {
        Duration::hours(1)
    }

    #[test]
    fn clean_strips_code_fence() {
        let reply = "Here are the events:\n```json\n[{\"title\": \"Quiz\"}]\n```\nLet me know!";
        assert_eq!(clean_model_output(reply), Some("[{\"title\": \"Quiz\"}]"));
    }

    #[test]
    fn clean_strips_surrounding_prose() {
        let reply = "Sure! {\"events\": []} Hope that helps.";
        assert_eq!(clean_model_output(reply), Some("{\"events\": []}"));
    }

    #[test]
    fn clean_handles_single_line_fence() {
        assert_eq!(clean_model_output("```json [1, 2]```"), Some("[1, 2]"));
    }

    #[test]
    fn clean_skips_bracketed_prose_before_payload() {
        let reply = "Found 2 events [see below]:\n{\"events\": []}";
        assert_eq!(clean_model_output(reply), Some("{\"events\": []}"));
    }

    #[test]
    fn clean_without_json_is_none() {
        assert_eq!(clean_model_output("I couldn't read the image."), None);
    }

    #[test]
    fn extracts_plain_array() {
        let reply = r#"[
            {"title": "Midterm", "start": "2025-03-10T09:00:00", "end": "2025-03-10T10:30:00", "location": "Hall B"},
            {"title": "Lab", "start": "2025-03-11T14:00:00", "end": "2025-03-11T16:00:00"}
        ]"#;

        let events = extract_events(reply, hour()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Midterm");
        assert_eq!(events[0].location.as_deref(), Some("Hall B"));
        assert_eq!(events[1].end, "2025-03-11T16:00:00");
    }

    #[test]
    fn extracts_wrapped_object_with_aliases() {
        let reply = "```json\n{\"events\": [{\"summary\": \"Seminar\", \"startTime\": \"2025-04-02T10:00\", \"endTime\": \"2025-04-02T11:00\"}]}\n```";

        let events = extract_events(reply, hour()).unwrap();
        assert_eq!(events, vec![CalendarEvent::new("Seminar", "2025-04-02T10:00", "2025-04-02T11:00")]);
    }

    #[test]
    fn extracts_single_event_object() {
        let reply = r#"{"title": "Dentist", "start": "2025-05-01T08:00:00", "end": "2025-05-01T08:30:00"}"#;
        let events = extract_events(reply, hour()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Dentist");
    }

    #[test]
    fn missing_end_defaults_to_duration_after_start() {
        let reply = r#"[{"title": "Standup", "start": "2025-03-10T09:00"}]"#;
        let events = extract_events(reply, Duration::minutes(15)).unwrap();
        assert_eq!(events[0].end, "2025-03-10T09:15:00");
    }

    #[test]
    fn unreadable_start_passes_through_for_encoder() {
        let reply = r#"[{"title": "Someday", "start": "after lunch"}]"#;
        let events = extract_events(reply, hour()).unwrap();
        assert_eq!(events[0].start, "after lunch");
        assert_eq!(events[0].end, "after lunch");
    }

    #[test]
    fn entries_without_title_or_start_are_dropped() {
        let reply = r#"[
            {"start": "2025-03-10T09:00"},
            {"title": "   ", "start": "2025-03-10T09:00"},
            {"title": "No time"},
            {"title": "Kept", "start": "2025-03-10T09:00"}
        ]"#;
        let events = extract_events(reply, hour()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Kept");
    }

    #[test]
    fn extracts_events_after_bracketed_prose() {
        let reply = "Found 2 events [see below]:\n{\"events\": [\n  {\"title\": \"Quiz\", \"start\": \"2025-03-12T10:00:00\", \"end\": \"2025-03-12T10:20:00\"},\n  {\"title\": \"Review {ch. 4}\", \"start\": \"2025-03-13T15:00:00\"}\n]}";

        let events = extract_events(reply, hour()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Quiz");
        assert_eq!(events[1].title, "Review {ch. 4}");
        assert_eq!(events[1].end, "2025-03-13T16:00:00");
    }

    #[test]
    fn reply_without_json_is_an_error() {
        let err = extract_events("Sorry, the photo is too blurry.", hour()).unwrap_err();
        assert!(matches!(err, SnapcalError::Extract(_)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = extract_events("[{\"title\": \"Quiz\",]", hour()).unwrap_err();
        assert!(matches!(err, SnapcalError::Json(_)));
    }

    #[test]
    fn recommendations_from_json_objects() {
        let reply = "```json\n[{\"course\": \"CS 101\", \"reason\": \"Foundations\"}, {\"title\": \"MATH 221\"}]\n```";
        let recs = extract_recommendations(reply);
        assert_eq!(
            recs,
            vec![
                Recommendation {
                    course: "CS 101".into(),
                    reason: Some("Foundations".into())
                },
                Recommendation {
                    course: "MATH 221".into(),
                    reason: None
                },
            ]
        );
    }

    #[test]
    fn recommendations_from_wrapped_strings() {
        let reply = r#"{"recommendations": ["Linear Algebra", "Data Structures"]}"#;
        let recs = extract_recommendations(reply);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].course, "Data Structures");
    }

    #[test]
    fn recommendations_from_plain_text_list() {
        let reply = "1. Intro to Psychology\n2) Statistics\n- Creative Writing\n\n• Ethics";
        let courses: Vec<String> = extract_recommendations(reply)
            .into_iter()
            .map(|r| r.course)
            .collect();
        assert_eq!(
            courses,
            vec!["Intro to Psychology", "Statistics", "Creative Writing", "Ethics"]
        );
    }
}
