//! Command-line interface definitions
//!
//! Argument parsing and output formatting.

pub mod args;
pub mod output;

pub use args::{Cli, Commands, OutputFormat};
