use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use snapcal_core::CalendarEvent;
use snapcal_core::snapcal_config::SnapcalConfig;

use crate::OutputArgs;
use crate::output::write_calendar;

pub fn run(config: &SnapcalConfig, input: &Path, output: &OutputArgs) -> Result<()> {
    let content = read_input(input)?;
    let events = parse_events(&content)
        .with_context(|| format!("Could not read events from {}", input.display()))?;

    write_calendar(config, output, &events, Utc::now())?;
    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Could not read stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(input).with_context(|| format!("Could not read {}", input.display()))
}

/// A JSON array of events, or an object with an `events` array.
fn parse_events(content: &str) -> Result<Vec<CalendarEvent>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Events {
        List(Vec<CalendarEvent>),
        Wrapped { events: Vec<CalendarEvent> },
    }

    let events = match serde_json::from_str::<Events>(content)? {
        Events::List(events) | Events::Wrapped { events } => events,
    };
    Ok(events)
}
