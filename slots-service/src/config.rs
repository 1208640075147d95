// SPDX-License-Identifier: GPL-3.0-only

//! Command line and settings file
//!
//! Settings come from an optional TOML file; command line flags override it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use slots_sys::{DEFAULT_ALIAS_CONFIG, DEFAULT_SMART_TIMEOUT};

use crate::error::SettingsError;

/// Default wait for a kernel event before a full resync.
pub const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LoggingLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON document on a single line
    #[default]
    Json,
    /// Human-readable table
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "drive-slots")]
#[command(version, about = "Report drive bay occupancy and stream live changes as JSON")]
pub struct Args {
    /// Keep running after the initial report and stream changes
    #[arg(long)]
    pub live: bool,

    /// Report drives without a slot alias under the "unknown" slot id
    #[arg(long)]
    pub include_non_aliased: bool,

    /// Leave empty slots out of a single-shot report
    #[arg(long, conflicts_with = "live")]
    pub exclude_empty: bool,

    /// Output format of a single-shot report
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, conflicts_with = "live")]
    pub format: OutputFormat,

    /// TOML settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Slot alias configuration
    #[arg(long, value_name = "FILE")]
    pub alias_file: Option<PathBuf>,

    /// smartctl binary
    #[arg(long, value_name = "PATH")]
    pub smartctl: Option<PathBuf>,

    /// Upper bound on a single smartctl run
    #[arg(long, value_name = "SECS")]
    pub smart_timeout_secs: Option<u64>,

    /// Seconds without a device event before a full resync
    #[arg(long, value_name = "SECS")]
    pub refresh_secs: Option<u64>,

    #[arg(long, value_enum)]
    pub log_level: Option<LoggingLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub alias_file: PathBuf,
    pub smartctl: PathBuf,
    pub smart_timeout_secs: u64,
    pub refresh_secs: u64,
    pub include_non_aliased: bool,
    pub log_level: LoggingLevel,
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alias_file: PathBuf::from(DEFAULT_ALIAS_CONFIG),
            smartctl: PathBuf::from("smartctl"),
            smart_timeout_secs: DEFAULT_SMART_TIMEOUT.as_secs(),
            refresh_secs: DEFAULT_REFRESH_SECS,
            include_non_aliased: false,
            log_level: LoggingLevel::default(),
            log_dir: None,
        }
    }
}

impl Settings {
    /// Settings file (if any) overlaid with command line flags.
    pub fn resolve(args: &Args) -> Result<Self, SettingsError> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        settings.apply_args(args);
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = fs::read_to_string(path).map_err(|error| SettingsError::Invalid {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        toml::from_str(&raw).map_err(|error| SettingsError::Invalid {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(alias_file) = &args.alias_file {
            self.alias_file = alias_file.clone();
        }
        if let Some(smartctl) = &args.smartctl {
            self.smartctl = smartctl.clone();
        }
        if let Some(secs) = args.smart_timeout_secs {
            self.smart_timeout_secs = secs;
        }
        if let Some(secs) = args.refresh_secs {
            self.refresh_secs = secs;
        }
        if let Some(level) = args.log_level {
            self.log_level = level;
        }
        self.include_non_aliased |= args.include_non_aliased;
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.smart_timeout_secs == 0 {
            return Err(SettingsError::InvalidValue {
                field: "smart_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.refresh_secs == 0 {
            return Err(SettingsError::InvalidValue {
                field: "refresh_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn smart_timeout(&self) -> Duration {
        Duration::from_secs(self.smart_timeout_secs)
    }

    pub fn refresh_window(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("drive-slots").chain(argv.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_match_the_stock_deployment() {
        let settings = Settings::resolve(&args(&[])).expect("defaults are valid");

        assert_eq!(settings.alias_file, PathBuf::from("/etc/vdev_id.conf"));
        assert_eq!(settings.smartctl, PathBuf::from("smartctl"));
        assert_eq!(settings.smart_timeout(), Duration::from_secs(5));
        assert_eq!(settings.refresh_window(), Duration::from_secs(30));
        assert!(!settings.include_non_aliased);
    }

    #[test]
    fn parses_partial_toml() {
        let settings: Settings = toml::from_str(
            "alias_file = \"/srv/vdev_id.conf\"\nrefresh_secs = 10\nlog_level = \"debug\"\n",
        )
        .expect("settings should parse");

        assert_eq!(settings.alias_file, PathBuf::from("/srv/vdev_id.conf"));
        assert_eq!(settings.refresh_secs, 10);
        assert_eq!(settings.log_level, LoggingLevel::Debug);
        assert_eq!(settings.smart_timeout_secs, 5);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(toml::from_str::<Settings>("refresh = 10\n").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut settings = Settings {
            refresh_secs: 10,
            ..Settings::default()
        };
        settings.apply_args(&args(&[
            "--refresh-secs",
            "60",
            "--include-non-aliased",
            "--alias-file",
            "/tmp/vdev_id.conf",
        ]));

        assert_eq!(settings.refresh_secs, 60);
        assert!(settings.include_non_aliased);
        assert_eq!(settings.alias_file, PathBuf::from("/tmp/vdev_id.conf"));
    }

    #[test]
    fn zero_windows_are_invalid() {
        let error = Settings::resolve(&args(&["--smart-timeout-secs", "0"])).unwrap_err();
        assert!(matches!(
            error,
            SettingsError::InvalidValue {
                field: "smart_timeout_secs",
                ..
            }
        ));
    }

    #[test]
    fn missing_settings_file_is_reported() {
        let error = Settings::resolve(&args(&["--config", "/nonexistent/drive-slots.toml"]))
            .unwrap_err();
        assert!(matches!(error, SettingsError::NotFound { .. }));
    }

    #[test]
    fn single_shot_options_conflict_with_live() {
        let argv = ["drive-slots", "--live", "--exclude-empty"];
        assert!(Args::try_parse_from(argv).is_err());

        let argv = ["drive-slots", "--live", "--format", "table"];
        assert!(Args::try_parse_from(argv).is_err());

        let parsed = args(&["--live", "--include-non-aliased"]);
        assert!(parsed.live && parsed.include_non_aliased);
        assert_eq!(parsed.format, OutputFormat::Json);
    }
}
