// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # yt-ingest
//!
//! Batch pipeline that moves the public YouTube trending-video dataset from
//! Kaggle into a BigQuery external table.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use yt_ingest::{Pipeline, PipelineConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PipelineConfig::from_env();
//!     let report = Pipeline::from_config(&config)?.run().await?;
//!     for step in &report.steps {
//!         println!("{}: {}", step.name, step.output.summary());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  fetch             transform              publish               register
//! ┌───────────────┐ ┌────────────────────┐ ┌────────────────────┐ ┌───────────────────────────┐
//! │YT_Extract_Data│►│Conv_csv_to_parquet │►│load_parquet_to_gcs │►│bq_YT_external_table_task  │
//! │Kaggle .zip    │ │CSV + JSON → Parquet│ │5 MiB parts → GCS   │ │external table (PARQUET)   │
//! └───────────────┘ └────────────────────┘ └────────────────────┘ └───────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Pipeline configuration
pub mod config;

/// Authentication (Basic, Bearer, service account)
pub mod auth;

/// HTTP client
pub mod http;

/// Tabular record set
pub mod frame;

/// Input decoders (CSV, JSON)
pub mod decode;

/// Arrow conversion and Parquet output
pub mod output;

/// Dataset download and unpacking
pub mod fetch;

/// Merge and enrichment
pub mod transform;

/// Object storage upload
pub mod publish;

/// Warehouse external tables
pub mod register;

/// Step orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use frame::Frame;
pub use pipeline::{Pipeline, PipelineReport, Step, StepOutput};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
