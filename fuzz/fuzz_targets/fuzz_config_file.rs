//! Fuzz target for config.toml parsing.
//!
//! Tests that config file parsing handles arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sn_config::ConfigFile;

fuzz_target!(|data: &str| {
    let _ = ConfigFile::from_toml_str(data);
});
