//! Terminal rendering for snapcal-core types.
//!
//! Extension traits that add colored output to core types using owo_colors.

use chrono::Local;
use owo_colors::OwoColorize;
use snapcal_core::extract::Recommendation;
use snapcal_core::ics::{DecodedEvent, SkippedEvent};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DecodedEvent {
    fn render(&self) -> String {
        let start = self.start.with_timezone(&Local);
        let end = self.end.with_timezone(&Local);

        let time = if start.date_naive() == end.date_naive() {
            format!("{} {}-{}", start.format("%a %b %-d"), start.format("%H:%M"), end.format("%H:%M"))
        } else {
            format!("{} - {}", start.format("%a %b %-d %H:%M"), end.format("%a %b %-d %H:%M"))
        };

        let mut line = format!("  {} {}", time.dimmed(), self.summary.bold());
        if let Some(ref location) = self.location {
            line.push_str(&format!(" {}", format!("@ {}", location).dimmed()));
        }
        line
    }
}

impl Render for SkippedEvent {
    fn render(&self) -> String {
        format!(
            "  {} #{} \"{}\": {}",
            "skipped".yellow(),
            self.index + 1,
            self.title,
            self.reason
        )
    }
}

/// Numbered line for a recommendation at `position` (1-based).
pub fn render_recommendation(position: usize, rec: &Recommendation) -> String {
    match rec.reason {
        Some(ref reason) => format!("  {}. {} {}", position, rec.course.bold(), reason.dimmed()),
        None => format!("  {}. {}", position, rec.course.bold()),
    }
}
