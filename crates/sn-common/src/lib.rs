//! Storage-node stats common types, IDs, and errors.
//!
//! This crate provides foundational types shared across sn-core modules:
//! - Piece identity type
//! - Common error types
//! - Report output formats

pub mod error;
pub mod id;
pub mod output;

pub use error::{Error, ErrorCategory, Result};
pub use id::PieceId;
pub use output::OutputFormat;
