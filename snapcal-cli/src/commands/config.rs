use anyhow::Result;
use owo_colors::OwoColorize;
use snapcal_core::snapcal_config::SnapcalConfig;
use snapcal_core::time::Zone;

/// Width of the label column, colon included.
const LABEL_WIDTH: usize = 11;

pub fn run() -> Result<()> {
    let config_path = SnapcalConfig::config_path()?;
    let config = SnapcalConfig::load()?;
    let zone = config.zone()?;

    let zone_label = match zone {
        Zone::Local => format!(
            "local ({})",
            iana_time_zone::get_timezone().unwrap_or_else(|_| "unknown".to_string())
        ),
        other => other.to_string(),
    };

    let key_status = if std::env::var(&config.model.api_key_env).is_ok() {
        "(set)".green().to_string()
    } else {
        "(not set)".red().to_string()
    };

    println!("{}", "Paths".bold());
    println!("{}", row("Config", config_path.display()));
    println!("{}", row("Output", config.output_path().display()));
    println!();
    println!("{}", "Encoding".bold());
    println!("{}", row("Time zone", zone_label));
    println!("{}", row("PRODID", format!("-//{}//EN", config.product_name)));
    println!("{}", row("UIDs", format!("{:?} @{}", config.uid, config.uid_namespace)));
    println!("{}", row("Escaping", format!("{:?}", config.escape)));
    println!("{}", row("End<start", format!("{:?}", config.end_before_start)));
    println!("{}", row("Invalid", format!("{:?}", config.invalid_events)));
    println!();
    println!("{}", "Model".bold());
    println!("{}", row("Endpoint", &config.model.endpoint));
    println!("{}", row("Model", &config.model.model));
    println!(
        "{}",
        row("API key", format!("${} {}", config.model.api_key_env, key_status))
    );

    Ok(())
}

fn row(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<width$} {}", format!("{}:", label), value, width = LABEL_WIDTH)
}
