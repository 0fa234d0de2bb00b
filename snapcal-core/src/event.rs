//! Event records handed to the ICS encoder.
//!
//! These are plain value objects. Times stay as the strings the upstream
//! collaborator produced; the encoder parses them against a time zone.

use serde::{Deserialize, Serialize};

/// A calendar event extracted from a photo, schedule or whiteboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(alias = "summary", alias = "name")]
    pub title: String,
    /// ISO-8601-like date-time, usually without an offset
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        CalendarEvent {
            title: title.into(),
            start: start.into(),
            end: end.into(),
            location: None,
            description: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Location, treating an empty string as absent.
    pub fn location(&self) -> Option<&str> {
        non_empty(self.location.as_deref())
    }

    /// Description, treating an empty string as absent.
    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
