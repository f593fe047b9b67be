//! Configuration module for Autosuggest Explorer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use autosuggest_explorer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("explorer.toml")).unwrap();
//! println!("Alphabet has {} letters", config.job.letters().len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EndpointConfig, JobConfig, OutputConfig, UserAgentConfig, DEFAULT_ALPHABET,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
