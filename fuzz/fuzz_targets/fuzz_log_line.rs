//! Fuzz target for single log line parsing.
//!
//! Tests that `parse_line` handles arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sn_core::parse::parse_line;

fuzz_target!(|data: &str| {
    let _ = parse_line(data);
});
