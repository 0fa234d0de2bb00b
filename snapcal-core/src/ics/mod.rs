//! ICS file generation and parsing.
//!
//! This module handles writing and reading the subset of RFC 5545 needed
//! for calendar-app import: one VCALENDAR with flat VEVENT blocks.

mod escape;
mod generate;
mod line;
mod options;
mod parse;

pub use escape::escape_text;
pub use generate::{IcsDocument, SkippedEvent, encode};
pub use options::{EncodeOptions, EndPolicy, EscapePolicy, InvalidEventPolicy, LineEnding, UidStrategy};
pub use parse::{DecodedEvent, decode};
