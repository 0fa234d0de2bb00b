//! Global snapcal configuration.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use chrono::Duration;
use serde::Deserialize;

use crate::constants::{DEFAULT_EVENT_DURATION, DEFAULT_PRODUCT_NAME, DEFAULT_UID_NAMESPACE};
use crate::error::{SnapcalError, SnapcalResult};
use crate::ics::{EncodeOptions, EndPolicy, EscapePolicy, InvalidEventPolicy, LineEnding, UidStrategy};
use crate::time::Zone;

static DEFAULT_OUTPUT_DIR: &str = ".";

/// Configuration at ~/.config/snapcal/config.toml
///
/// Every key can be overridden with a `SNAPCAL_` environment variable
/// (`SNAPCAL_TIMEZONE`, `SNAPCAL_MODEL__ENDPOINT`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SnapcalConfig {
    pub product_name: String,
    pub uid_namespace: String,
    /// IANA zone for times without an offset. Unset means the system zone.
    pub timezone: Option<String>,
    pub escape: EscapePolicy,
    pub uid: UidStrategy,
    pub end_before_start: EndPolicy,
    pub invalid_events: InvalidEventPolicy,
    pub line_ending: LineEnding,
    /// Event length when the model gives no end, e.g. "1h" or "45m"
    pub default_duration: String,
    pub output_dir: PathBuf,
    pub model: ModelConfig,
}

/// Hosted model settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub max_tokens: u32,
}

impl Default for SnapcalConfig {
    fn default() -> Self {
        SnapcalConfig {
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            uid_namespace: DEFAULT_UID_NAMESPACE.to_string(),
            timezone: None,
            escape: EscapePolicy::default(),
            uid: UidStrategy::default(),
            end_before_start: EndPolicy::default(),
            invalid_events: InvalidEventPolicy::default(),
            line_ending: LineEnding::default(),
            default_duration: DEFAULT_EVENT_DURATION.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            model: ModelConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 1500,
        }
    }
}

impl SnapcalConfig {
    pub fn config_path() -> SnapcalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SnapcalError::Config("Could not determine config directory".into()))?
            .join("snapcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented default file first if
    /// none exists.
    pub fn load() -> SnapcalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (missing is fine), then apply environment
    /// overrides.
    pub fn load_from(path: &Path) -> SnapcalResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("SNAPCAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SnapcalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SnapcalError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SnapcalResult<()> {
        let contents = format!(
            "\
# snapcal configuration

# Written into PRODID as -//<product_name>//EN:
# product_name = \"{product}\"

# Domain part of event UIDs:
# uid_namespace = \"{namespace}\"

# Time zone for event times without an offset (defaults to the system zone):
# timezone = \"America/New_York\"

# Text escaping: \"rfc5545\" or \"verbatim\"
# escape = \"rfc5545\"

# UIDs: \"timestamp\" (new per export) or \"content-hash\" (stable across re-imports)
# uid = \"timestamp\"

# Events ending before they start: \"allow\", \"reject\" or \"clamp\"
# end_before_start = \"allow\"

# Events that can't be encoded: \"skip\" or \"abort\"
# invalid_events = \"skip\"

# Line endings: \"crlf\" or \"lf\"
# line_ending = \"crlf\"

# Length of events the model gave no end time for:
# default_duration = \"{duration}\"

# Where .ics files are written:
# output_dir = \"{output_dir}\"

# [model]
# endpoint = \"https://api.openai.com/v1/chat/completions\"
# model = \"gpt-4o-mini\"
# api_key_env = \"OPENAI_API_KEY\"
# max_tokens = 1500
",
            product = DEFAULT_PRODUCT_NAME,
            namespace = DEFAULT_UID_NAMESPACE,
            duration = DEFAULT_EVENT_DURATION,
            output_dir = DEFAULT_OUTPUT_DIR,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SnapcalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SnapcalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn zone(&self) -> SnapcalResult<Zone> {
        match self.timezone {
            Some(ref name) => name.parse(),
            None => Ok(Zone::Local),
        }
    }

    pub fn default_duration(&self) -> SnapcalResult<Duration> {
        let std_dur = humantime::parse_duration(&self.default_duration).map_err(|e| {
            SnapcalError::Config(format!(
                "Invalid default_duration '{}': {}",
                self.default_duration, e
            ))
        })?;
        Duration::from_std(std_dur)
            .map_err(|_| SnapcalError::Config("default_duration is too large".into()))
    }

    /// Output directory with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned())
    }

    pub fn encode_options(&self) -> SnapcalResult<EncodeOptions> {
        Ok(EncodeOptions {
            product_name: self.product_name.clone(),
            uid_namespace: self.uid_namespace.clone(),
            zone: self.zone()?,
            escape: self.escape,
            uid: self.uid,
            end_before_start: self.end_before_start,
            invalid_events: self.invalid_events,
            line_ending: self.line_ending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = SnapcalConfig::load_from(&tmp.path().join("config.toml")).unwrap();

        assert_eq!(config.product_name, "snapcal");
        assert_eq!(config.escape, EscapePolicy::Rfc5545);
        assert_eq!(config.model.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.default_duration().unwrap(), Duration::hours(1));
    }

    #[test]
    fn default_config_file_parses_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        SnapcalConfig::create_default_config(&path).unwrap();
        assert!(path.exists());

        let config = SnapcalConfig::load_from(&path).unwrap();
        assert_eq!(config.uid, UidStrategy::Timestamp);
        assert_eq!(config.line_ending, LineEnding::Crlf);
        assert_eq!(config.timezone, None);
    }

    #[test]
    fn file_values_override_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
product_name = "Campus Planner"
timezone = "Europe/Berlin"
escape = "verbatim"
uid = "content-hash"
end_before_start = "clamp"
invalid_events = "abort"
line_ending = "lf"
default_duration = "45m"

[model]
model = "gpt-4o"
max_tokens = 800
"#,
        )
        .unwrap();

        let config = SnapcalConfig::load_from(&path).unwrap();
        let options = config.encode_options().unwrap();

        assert_eq!(options.product_name, "Campus Planner");
        assert_eq!(options.zone, Zone::Named(chrono_tz::Europe::Berlin));
        assert_eq!(options.escape, EscapePolicy::Verbatim);
        assert_eq!(options.uid, UidStrategy::ContentHash);
        assert_eq!(options.end_before_start, EndPolicy::Clamp);
        assert_eq!(options.invalid_events, InvalidEventPolicy::Abort);
        assert_eq!(options.line_ending, LineEnding::Lf);
        assert_eq!(config.default_duration().unwrap(), Duration::minutes(45));
        assert_eq!(config.model.model, "gpt-4o");
        assert_eq!(config.model.max_tokens, 800);
        // Unset keys in a table keep their defaults
        assert_eq!(config.model.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn bad_values_are_config_errors() {
        let config = SnapcalConfig {
            timezone: Some("Nowhere/Special".into()),
            default_duration: "a while".into(),
            ..Default::default()
        };

        assert!(matches!(config.zone(), Err(SnapcalError::Config(_))));
        assert!(matches!(config.default_duration(), Err(SnapcalError::Config(_))));
        assert!(config.encode_options().is_err());
    }

    #[test]
    fn output_path_expands_tilde() {
        let config = SnapcalConfig {
            output_dir: PathBuf::from("~/calendars"),
            ..Default::default()
        };
        let expanded = config.output_path();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("calendars"));
    }
}
