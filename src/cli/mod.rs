//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `run` - Run all steps in order
//! - `fetch`, `transform`, `publish`, `register` - Run one step
//! - `check` - Validate the configuration
//! - `inspect` - Summarize a Parquet file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
