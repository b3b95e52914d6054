//! Optional TOML config file.
//!
//! ```toml
//! period_days = 7
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use sn_common::OutputFormat;
use std::path::Path;

use crate::validate::{ValidationError, ValidationResult};

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Period length in whole days (validated at resolution time).
    #[serde(default)]
    pub period_days: Option<i64>,

    /// Report format.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl ConfigFile {
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ValidationError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ValidationResult<Self> {
        toml::from_str(content).map_err(|e| ValidationError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let cfg = ConfigFile::from_toml_str("period_days = 7\nformat = \"json\"\n").unwrap();
        assert_eq!(cfg.period_days, Some(7));
        assert_eq!(cfg.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_parse_empty_file() {
        let cfg = ConfigFile::from_toml_str("").unwrap();
        assert_eq!(cfg, ConfigFile::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ConfigFile::from_toml_str("period = 7\n").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ConfigFile::from_file(Path::new("/nonexistent/sn-stats.toml")).unwrap_err();
        assert!(matches!(err, ValidationError::IoError { .. }));
    }
}
