use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use log::info;
use owo_colors::OwoColorize;
use snapcal_core::extract::extract_events;
use snapcal_core::snapcal_config::SnapcalConfig;

use crate::OutputArgs;
use crate::image::ImageInput;
use crate::model::ModelClient;
use crate::output::write_calendar;
use crate::prompts::ScanKind;
use crate::utils::tui::create_spinner;

pub async fn run(
    config: &SnapcalConfig,
    image_path: &Path,
    kind: ScanKind,
    output: &OutputArgs,
) -> Result<()> {
    let image = ImageInput::load(image_path)?;
    let client = ModelClient::from_config(&config.model)?;
    let default_duration = config.default_duration()?;

    let spinner = create_spinner(format!("Reading {}", image_path.display()));
    let reply = client.describe_image(&kind.prompt(Local::now()), &image).await;
    spinner.finish_and_clear();
    let reply = reply?;

    let events = extract_events(&reply, default_duration)
        .context("The model's reply did not contain a usable event list")?;
    info!("Model found {} event(s)", events.len());

    if events.is_empty() {
        println!("{}", "No events found in the image".dimmed());
        return Ok(());
    }

    write_calendar(config, output, &events, Utc::now())?;
    Ok(())
}
