//! Transform step
//!
//! Merges the regional CSV and category JSON files of one directory into a
//! single enriched frame and writes it as a Parquet artifact.
//!
//! ```text
//! *.csv  ──► Frame ──► drop description ──┐
//!                                         ├──► enrich ──► OutputSchema ──► Parquet
//! *.json ──► items ──► CategoryLookup ────┘
//! ```

mod category;
mod enrich;
mod merge;

pub use category::CategoryLookup;
pub use enrich::{enrich, CATEGORY_COLUMN, CATEGORY_ID_COLUMN};
pub use merge::{merge_directory, MergedInput, CATEGORY_ENVELOPE};

use crate::decode::TextEncoding;
use crate::error::Result;
use crate::output::{write_batch_to_parquet, OutputSchema, ParquetWriterConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Free-text column removed before the artifact is built
pub const DESCRIPTION_COLUMN: &str = "description";

/// How input files are read and the artifact is written
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Text encoding applied to every input file
    pub encoding: TextEncoding,
    /// Declared artifact schema
    pub schema: OutputSchema,
    /// Parquet writer settings
    pub writer: ParquetWriterConfig,
}

/// Outcome of a transform run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    /// CSV files merged
    pub tabular_files: usize,
    /// JSON category files merged
    pub nested_files: usize,
    /// Rows written
    pub rows: usize,
    /// Distinct category identifiers
    pub categories: usize,
    /// Artifact path
    pub output: PathBuf,
}

/// Merge `input_dir` and write the enriched artifact to `output`
pub fn transform_directory(
    input_dir: &Path,
    output: &Path,
    options: &TransformOptions,
) -> Result<TransformReport> {
    let MergedInput {
        mut frame,
        categories,
        tabular_files,
        nested_files,
    } = merge_directory(input_dir, options.encoding)?;

    frame.drop_column(DESCRIPTION_COLUMN)?;

    let lookup = CategoryLookup::from_entries(&categories)?;
    let enriched = enrich(frame, &lookup)?;

    let batch = options.schema.to_record_batch(&enriched)?;
    let rows = write_batch_to_parquet(output, &batch, &options.writer)?;

    info!(
        rows,
        path = %output.display(),
        "Wrote Parquet artifact"
    );

    Ok(TransformReport {
        tabular_files,
        nested_files,
        rows,
        categories: lookup.len(),
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests;
