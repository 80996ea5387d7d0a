//! # Mycora IO
//!
//! File formats around the simulation core.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Genome text parsing
//! - `config.toml` loading with defaults
//! - JSON snapshot export

/// Error types and result aliases for I/O operations
pub mod error;
/// Loading and saving `config.toml`
pub mod config;
/// Genome text files
pub mod genome;
/// Validated JSON helpers
pub mod serialization;

pub use config::{load_config, save_config};
pub use error::{IoError, Result};
pub use genome::{load_genome, parse_genome, Genome};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
