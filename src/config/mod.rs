//! Configuration module for Sumi-Gather
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_gather::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gather.toml")).unwrap();
//! println!("Harvesting {} URLs", config.urls.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractSection, FetchConfig, FetchSection, FieldEntry, DEFAULT_CONNECTION_LIMIT,
    DEFAULT_CONTAINER_SELECTOR, DEFAULT_RETRY_DELAY_SECONDS, DEFAULT_USER_AGENT,
    DEFAULT_WORKER_COUNT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

use crate::extract::SelectorExtractor;
use crate::ConfigError;

impl Config {
    /// Builds the page extractor described by the `[extract]` table
    pub fn build_extractor(&self) -> Result<SelectorExtractor, ConfigError> {
        SelectorExtractor::from_section(&self.extract)
    }
}
