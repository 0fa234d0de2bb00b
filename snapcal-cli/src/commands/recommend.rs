use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use snapcal_core::extract::extract_recommendations;
use snapcal_core::profile::StudentProfile;
use snapcal_core::snapcal_config::SnapcalConfig;

use crate::model::ModelClient;
use crate::prompts::RECOMMEND_SYSTEM_PROMPT;
use crate::render::render_recommendation;
use crate::utils::tui::create_spinner;

pub async fn run(config: &SnapcalConfig, profile_path: &Path) -> Result<()> {
    let profile = StudentProfile::load(profile_path)
        .with_context(|| format!("Could not load profile {}", profile_path.display()))?;
    if profile.is_empty() {
        anyhow::bail!("Profile {} has no fields filled in", profile_path.display());
    }

    let client = ModelClient::from_config(&config.model)?;

    let spinner = create_spinner("Asking for recommendations".to_string());
    let reply = client.ask(RECOMMEND_SYSTEM_PROMPT, &profile.to_prompt()).await;
    spinner.finish_and_clear();
    let reply = reply?;

    let recommendations = extract_recommendations(&reply);
    if recommendations.is_empty() {
        println!("{}", "No recommendations returned".dimmed());
        return Ok(());
    }

    println!("{}", "Recommended courses".bold());
    for (i, rec) in recommendations.iter().enumerate() {
        println!("{}", render_recommendation(i + 1, rec));
    }

    Ok(())
}
