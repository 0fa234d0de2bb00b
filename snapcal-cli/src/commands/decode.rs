use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use snapcal_core::ics::decode;

use crate::render::Render;

pub fn run(file: &Path) -> Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("Could not read {}", file.display()))?;
    let events = decode(&content)?;

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    println!("{}", format!("{} event(s)", events.len()).bold());
    for event in &events {
        println!("{}", event.render());
    }

    Ok(())
}
