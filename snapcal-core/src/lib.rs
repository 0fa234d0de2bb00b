//! Core types for snapcal.
//!
//! This crate provides everything the front-ends share:
//! - `event` for the event records extracted from photos and schedules
//! - `ics` for encoding those records into an iCalendar document (and reading one back)
//! - `extract` for pulling events and course recommendations out of model replies
//! - `sink` for handing generated files to the host

pub mod constants;
pub mod error;
pub mod event;
pub mod extract;
pub mod ics;
pub mod profile;
pub mod sink;
pub mod snapcal_config;
pub mod time;

pub use error::{SnapcalError, SnapcalResult};
pub use event::CalendarEvent;
