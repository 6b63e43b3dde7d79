//! Parquet artifact reader
//!
//! Used by `inspect` and by tests to look at what was written.

use crate::error::Result;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value;
use std::fs::File;
use std::path::Path;

/// Footer-level facts about a Parquet file
#[derive(Debug, Clone)]
pub struct ParquetSummary {
    /// Arrow schema decoded from the file
    pub schema: SchemaRef,
    /// Total rows
    pub num_rows: i64,
    /// Number of row groups
    pub num_row_groups: usize,
    /// Writer identification, when recorded
    pub created_by: Option<String>,
}

impl ParquetSummary {
    /// Column names and Arrow types, in order
    pub fn columns(&self) -> Vec<(String, String)> {
        self.schema
            .fields()
            .iter()
            .map(|f| (f.name().clone(), f.data_type().to_string()))
            .collect()
    }
}

/// Read the footer of a Parquet file
pub fn read_parquet_summary(path: impl AsRef<Path>) -> Result<ParquetSummary> {
    let file = File::open(path.as_ref())?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let metadata = builder.metadata().file_metadata();

    Ok(ParquetSummary {
        schema: builder.schema().clone(),
        num_rows: metadata.num_rows(),
        num_row_groups: builder.metadata().num_row_groups(),
        created_by: metadata.created_by().map(str::to_string),
    })
}

/// Read up to `limit` rows (all rows when `None`)
pub fn read_parquet(path: impl AsRef<Path>, limit: Option<usize>) -> Result<Vec<RecordBatch>> {
    let file = File::open(path.as_ref())?;
    let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    if let Some(limit) = limit {
        builder = builder.with_limit(limit);
    }

    let mut batches = Vec::new();
    for batch in builder.build()? {
        batches.push(batch?);
    }
    Ok(batches)
}

/// Render batches as a JSON array of row objects
pub fn batches_to_json(batches: &[RecordBatch]) -> Result<Value> {
    let mut writer = arrow::json::ArrayWriter::new(Vec::new());
    writer.write_batches(&batches.iter().collect::<Vec<_>>())?;
    writer.finish()?;

    let buf = writer.into_inner();
    if buf.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    Ok(serde_json::from_slice(&buf)?)
}
