mod commands;
mod image;
mod model;
mod output;
mod prompts;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use snapcal_core::snapcal_config::SnapcalConfig;

use crate::prompts::ScanKind;

#[derive(Parser)]
#[command(name = "snapcal")]
#[command(about = "Turn photos of calendars, schedules and whiteboards into .ics files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON list of events into an .ics file
    Encode {
        /// JSON file with events, or "-" for stdin
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Send an image to the model and turn the events it finds into an .ics file
    Scan {
        image: PathBuf,

        /// What the image shows
        #[arg(short, long, value_enum, default_value_t = ScanKind::Calendar)]
        kind: ScanKind,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Ask the model for course recommendations based on a profile (.toml or .json)
    Recommend { profile: PathBuf },
    /// List the events in an .ics file
    Decode { file: PathBuf },
    /// Show the config path and effective settings
    Config,
}

/// Where and how a generated calendar is written.
#[derive(Args, Debug, Clone, Default)]
struct OutputArgs {
    /// Directory to write the .ics file to (defaults to output_dir from config)
    #[arg(short, long, conflicts_with = "stdout")]
    out: Option<PathBuf>,

    /// Print the calendar instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// File name stem (a timestamp and .ics are appended)
    #[arg(short, long, default_value = "calendar")]
    name: String,

    /// Time zone for times without an offset (e.g. "Europe/Berlin", "UTC", "local")
    #[arg(long)]
    tz: Option<String>,

    /// Fail on the first invalid event instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { input, output } => {
            let config = SnapcalConfig::load()?;
            commands::encode::run(&config, &input, &output)
        }
        Commands::Scan {
            image,
            kind,
            output,
        } => {
            let config = SnapcalConfig::load()?;
            commands::scan::run(&config, &image, kind, &output).await
        }
        Commands::Recommend { profile } => {
            let config = SnapcalConfig::load()?;
            commands::recommend::run(&config, &profile).await
        }
        Commands::Decode { file } => commands::decode::run(&file),
        Commands::Config => commands::config::run(),
    }
}
