//! Encoder settings.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PRODUCT_NAME, DEFAULT_UID_NAMESPACE};
use crate::time::Zone;

/// How SUMMARY, LOCATION and DESCRIPTION values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscapePolicy {
    /// Escape `\`, `;`, `,` and newlines
    #[default]
    Rfc5545,
    /// Write text as-is, for consumers that expect unescaped output
    Verbatim,
}

/// How UIDs are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UidStrategy {
    /// `<generation millis>-<index>@<namespace>`. Unique within a document,
    /// but importing the same events twice creates duplicates.
    #[default]
    Timestamp,
    /// UUIDv5 of title, start and end. Re-imports update instead of duplicating.
    ContentHash,
}

/// What to do with an event whose end precedes its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndPolicy {
    /// Write it unchanged
    #[default]
    Allow,
    /// Treat it as an invalid event
    Reject,
    /// Move the end back to the start
    Clamp,
}

/// What to do with an event that can't be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidEventPolicy {
    /// Leave it out, log a warning and report it on the document
    #[default]
    Skip,
    /// Fail the whole document
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineEnding {
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub product_name: String,
    pub uid_namespace: String,
    pub zone: Zone,
    pub escape: EscapePolicy,
    pub uid: UidStrategy,
    pub end_before_start: EndPolicy,
    pub invalid_events: InvalidEventPolicy,
    pub line_ending: LineEnding,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            uid_namespace: DEFAULT_UID_NAMESPACE.to_string(),
            zone: Zone::default(),
            escape: EscapePolicy::default(),
            uid: UidStrategy::default(),
            end_before_start: EndPolicy::default(),
            invalid_events: InvalidEventPolicy::default(),
            line_ending: LineEnding::default(),
        }
    }
}

impl EncodeOptions {
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_escape(mut self, escape: EscapePolicy) -> Self {
        self.escape = escape;
        self
    }

    pub fn with_uid(mut self, uid: UidStrategy) -> Self {
        self.uid = uid;
        self
    }

    pub fn with_end_policy(mut self, policy: EndPolicy) -> Self {
        self.end_before_start = policy;
        self
    }

    pub fn with_invalid_events(mut self, policy: InvalidEventPolicy) -> Self {
        self.invalid_events = policy;
        self
    }

    pub fn with_line_ending(mut self, ending: LineEnding) -> Self {
        self.line_ending = ending;
        self
    }

    pub(crate) fn product_id(&self) -> String {
        format!("-//{}//EN", self.product_name)
    }
}
