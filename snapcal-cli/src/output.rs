//! Writing generated calendars.

use anyhow::Result;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use snapcal_core::CalendarEvent;
use snapcal_core::constants::ICS_MIME_TYPE;
use snapcal_core::ics::{EncodeOptions, IcsDocument, InvalidEventPolicy, encode};
use snapcal_core::sink::{DirSink, FileSink, StdoutSink, suggested_filename};
use snapcal_core::snapcal_config::SnapcalConfig;

use crate::OutputArgs;
use crate::render::Render;

/// Encoder options from config, with command-line overrides applied.
pub fn encode_options(config: &SnapcalConfig, args: &OutputArgs) -> Result<EncodeOptions> {
    let mut options = config.encode_options()?;

    if let Some(ref tz) = args.tz {
        options.zone = tz.parse()?;
    }
    if args.strict {
        options.invalid_events = InvalidEventPolicy::Abort;
    }

    Ok(options)
}

/// Encode `events` and hand the document to the sink chosen by `args`.
pub fn write_calendar(
    config: &SnapcalConfig,
    args: &OutputArgs,
    events: &[CalendarEvent],
    now: DateTime<Utc>,
) -> Result<IcsDocument> {
    let options = encode_options(config, args)?;
    let doc = encode(events, now, &options)?;
    let filename = suggested_filename(&args.name, now);

    if args.stdout {
        StdoutSink.write(&filename, ICS_MIME_TYPE, doc.as_str())?;
        report_skipped(&doc);
        return Ok(doc);
    }

    let dir = args.out.clone().unwrap_or_else(|| config.output_path());
    let sink = DirSink::new(dir);
    sink.write(&filename, ICS_MIME_TYPE, doc.as_str())?;

    report_skipped(&doc);
    println!(
        "{}",
        format!(
            "  Wrote {} event(s) to {}",
            doc.event_count(),
            sink.path_for(&filename).display()
        )
        .green()
    );

    Ok(doc)
}

/// Skipped events go to stderr so `--stdout` output stays a clean calendar.
fn report_skipped(doc: &IcsDocument) {
    for skipped in doc.skipped() {
        eprintln!("{}", skipped.render());
    }
}
