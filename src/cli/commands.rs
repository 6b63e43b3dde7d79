//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// YouTube trending data pipeline: Kaggle -> Parquet -> GCS -> BigQuery
#[derive(Parser, Debug)]
#[command(name = "yt-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); environment variables fill unset fields
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run all four steps in order
    Run {
        /// Upload into this local directory instead of the bucket and skip
        /// table registration
        #[arg(long)]
        to_dir: Option<PathBuf>,
    },

    /// Download and unpack the dataset
    Fetch,

    /// Merge the downloaded files into the Parquet artifact
    Transform,

    /// Upload the Parquet artifact
    Publish {
        /// Upload into this local directory instead of the bucket
        #[arg(long)]
        to_dir: Option<PathBuf>,
    },

    /// Create the external table over the uploaded artifact
    Register,

    /// Validate the configuration and print it with secrets masked
    Check,

    /// Show row count and schema of a Parquet file
    Inspect {
        /// Parquet file
        path: PathBuf,

        /// Also print the first N rows
        #[arg(long, default_value = "0")]
        rows: usize,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::try_parse_from(["yt-ingest", "run", "--config", "pipeline.yaml", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("pipeline.yaml")));
        assert!(matches!(cli.command, Commands::Run { to_dir: None }));
    }

    #[test]
    fn test_parse_inspect() {
        let cli =
            Cli::try_parse_from(["yt-ingest", "inspect", "data/All_YT_Data.parquet", "--rows", "3"])
                .unwrap();
        match cli.command {
            Commands::Inspect { path, rows } => {
                assert_eq!(path, PathBuf::from("data/All_YT_Data.parquet"));
                assert_eq!(rows, 3);
            }
            other => panic!("Expected inspect, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["yt-ingest", "serve"]).is_err());
    }
}
