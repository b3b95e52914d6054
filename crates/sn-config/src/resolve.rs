//! Settings resolution and config file discovery.
//!
//! Resolution order for each setting: CLI arguments → environment variables →
//! config file → defaults. The period length has no default and must come
//! from one of the first three.

use sn_common::OutputFormat;
use std::path::{Path, PathBuf};

use crate::file::ConfigFile;
use crate::period::PeriodLength;
use crate::validate::{ValidationError, ValidationResult};

/// Where a setting (or the config file) was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Read from the config file.
    ConfigFile,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_PERIOD_DAYS: &str = "SN_STATS_PERIOD_DAYS";
pub const ENV_FORMAT: &str = "SN_STATS_FORMAT";
pub const ENV_CONFIG_PATH: &str = "SN_STATS_CONFIG";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.toml";

/// Application name for XDG directories.
const APP_NAME: &str = "sn-stats";

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub period_days: Option<i64>,
    pub format: Option<OutputFormat>,
    pub config_path: Option<PathBuf>,
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub period: PeriodLength,
    pub period_source: ConfigSource,
    pub format: OutputFormat,
    pub format_source: ConfigSource,
    /// Config file that was loaded, if any.
    pub config_file: Option<PathBuf>,
}

/// Resolve settings from CLI overrides, the process environment and the
/// config file.
pub fn resolve_settings(overrides: &SettingsOverrides) -> ValidationResult<Settings> {
    resolve_settings_with(overrides, |key| std::env::var(key).ok(), dirs::config_dir())
}

/// Resolve settings with an explicit environment lookup and XDG config root.
pub fn resolve_settings_with<F>(
    overrides: &SettingsOverrides,
    env: F,
    xdg_config: Option<PathBuf>,
) -> ValidationResult<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let config_file = resolve_config_path(overrides.config_path.as_deref(), &env, xdg_config)?;
    let file = match &config_file {
        Some(path) => ConfigFile::from_file(path)?,
        None => ConfigFile::default(),
    };

    let (days, period_source) = if let Some(days) = overrides.period_days {
        (days, ConfigSource::CliArgument)
    } else if let Some(raw) = env(ENV_PERIOD_DAYS) {
        let days = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidValue {
                field: ENV_PERIOD_DAYS.to_string(),
                message: format!("not an integer: {:?}", raw),
            })?;
        (days, ConfigSource::Environment)
    } else if let Some(days) = file.period_days {
        (days, ConfigSource::ConfigFile)
    } else {
        return Err(ValidationError::MissingField(
            "period length in days (positional DAYS, SN_STATS_PERIOD_DAYS, or period_days)"
                .to_string(),
        ));
    };
    let period = PeriodLength::from_days(days)?;

    let (format, format_source) = if let Some(format) = overrides.format {
        (format, ConfigSource::CliArgument)
    } else if let Some(raw) = env(ENV_FORMAT) {
        let format = raw
            .parse::<OutputFormat>()
            .map_err(|message| ValidationError::InvalidValue {
                field: ENV_FORMAT.to_string(),
                message,
            })?;
        (format, ConfigSource::Environment)
    } else if let Some(format) = file.format {
        (format, ConfigSource::ConfigFile)
    } else {
        (OutputFormat::default(), ConfigSource::BuiltinDefault)
    };

    Ok(Settings {
        period,
        period_source,
        format,
        format_source,
        config_file,
    })
}

/// Locate the config file.
///
/// An explicitly named file (CLI or env) must exist; the XDG location is
/// optional.
fn resolve_config_path<F>(
    cli_path: Option<&Path>,
    env: &F,
    xdg_config: Option<PathBuf>,
) -> ValidationResult<Option<PathBuf>>
where
    F: Fn(&str) -> Option<String>,
{
    // 1. CLI argument
    if let Some(path) = cli_path {
        return require_exists(path.to_path_buf()).map(Some);
    }

    // 2. Environment variable
    if let Some(env_path) = env(ENV_CONFIG_PATH) {
        return require_exists(PathBuf::from(env_path)).map(Some);
    }

    // 3. XDG config directory
    if let Some(xdg_config) = xdg_config {
        let path = xdg_config.join(APP_NAME).join(CONFIG_FILENAME);
        if path.is_file() {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

fn require_exists(path: PathBuf) -> ValidationResult<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ValidationError::IoError {
            path: path.display().to_string(),
            message: "config file not found".to_string(),
        })
    }
}

/// Get the XDG config directory for sn-stats.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
