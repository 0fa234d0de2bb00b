//! Delivering generated files.
//!
//! The encoder only produces text. Where it ends up (a directory, stdout,
//! a browser download) is up to the host, which supplies a [`FileSink`].

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::debug;

use crate::error::{SnapcalError, SnapcalResult};

/// A place generated files can be written to.
pub trait FileSink {
    fn write(&self, filename: &str, mime_type: &str, content: &str) -> SnapcalResult<()>;
}

/// Writes files into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSink { dir: dir.into() }
    }

    /// Where `filename` will be written.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl FileSink for DirSink {
    fn write(&self, filename: &str, mime_type: &str, content: &str) -> SnapcalResult<()> {
        if filename.is_empty() || filename.contains(&['/', '\\'][..]) || filename == ".." {
            return Err(SnapcalError::Sink(format!(
                "'{}' is not a plain file name",
                filename
            )));
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(filename);
        std::fs::write(&path, content)?;

        debug!(
            "Wrote {} ({}, {} bytes)",
            path.display(),
            mime_type,
            content.len()
        );
        Ok(())
    }
}

/// Prints file contents to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl FileSink for StdoutSink {
    fn write(&self, filename: &str, mime_type: &str, content: &str) -> SnapcalResult<()> {
        debug!("Writing {} ({}) to stdout", filename, mime_type);
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// File name for a generated calendar: `<stem>-YYYYMMDD-HHMMSS.ics`.
///
/// The stem is slugified; an empty stem becomes `calendar`.
pub fn suggested_filename(stem: &str, now: DateTime<Utc>) -> String {
    let slug = slug::slugify(stem);
    let slug = if slug.is_empty() { "calendar".to_string() } else { slug };

    format!("{}-{}.ics", slug, now.format("%Y%m%d-%H%M%S"))
}
