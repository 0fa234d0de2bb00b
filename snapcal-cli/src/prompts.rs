//! Prompts sent to the hosted model.

use chrono::{DateTime, Local};
use clap::ValueEnum;

/// What kind of image is being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanKind {
    /// A printed or handwritten calendar page
    Calendar,
    /// A class or work schedule
    Schedule,
    /// Notes on a whiteboard mentioning dates
    Whiteboard,
}

const EVENT_FORMAT: &str = r#"Respond with only a JSON array, no prose and no markdown. Each element must be:
{"title": string, "start": "YYYY-MM-DDTHH:MM:SS", "end": "YYYY-MM-DDTHH:MM:SS", "location": string or null, "description": string or null}
Use local wall-clock times without a time zone offset. If an end time is not shown, omit "end"."#;

impl ScanKind {
    /// Instructions for this kind of image, anchored to `now` so relative
    /// dates ("next Tuesday") and missing years resolve sensibly.
    pub fn prompt(&self, now: DateTime<Local>) -> String {
        let task = match self {
            ScanKind::Calendar => {
                "This image shows a calendar page. List every event written on it."
            }
            ScanKind::Schedule => {
                "This image shows a schedule. List every session as a separate event. \
                 For weekly recurring classes, list the occurrences in the current week."
            }
            ScanKind::Whiteboard => {
                "This image shows a whiteboard. Find every deadline, exam, meeting or other \
                 dated item and list it as an event."
            }
        };

        format!(
            "{}\nToday is {}. If a year is missing, assume the next occurrence on or after today.\n{}",
            task,
            now.format("%A, %Y-%m-%d"),
            EVENT_FORMAT
        )
    }
}

pub const RECOMMEND_SYSTEM_PROMPT: &str = "You are an academic advisor. Suggest 5 to 8 courses \
that fit the student's profile. Do not suggest courses they have already completed. Respond \
with only a JSON array of objects {\"course\": string, \"reason\": string}.";
