//! Output module for harvest results
//!
//! This module handles:
//! - Rendering the result map as JSON
//! - Recording and printing run statistics

mod json;
pub mod stats;

pub use json::{render_json, write_harvest};
pub use stats::{print_statistics, RunStats};
