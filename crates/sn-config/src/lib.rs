//! Storage-node stats configuration loading and validation.
//!
//! This crate provides:
//! - `PeriodLength`, the only semantic parameter of a run
//! - An optional TOML config file
//! - Settings resolution (CLI → env → config file → defaults)

pub mod file;
pub mod period;
pub mod resolve;
pub mod validate;

pub use file::ConfigFile;
pub use period::PeriodLength;
pub use resolve::{resolve_settings, ConfigSource, Settings, SettingsOverrides};
pub use validate::{ValidationError, ValidationResult};
