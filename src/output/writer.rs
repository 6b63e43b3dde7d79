//! Parquet artifact writer
//!
//! Writes RecordBatches to a local Parquet file. The file is written under a
//! temporary name next to the target and renamed into place on close, so an
//! interrupted run never leaves a truncated artifact at the final path.

use crate::error::{Error, Result};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Configuration for the Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    created_by: String,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024,
            created_by: concat!("yt-ingest ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings (Snappy, 1M-row groups)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set maximum rows per row group
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Compression algorithm
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Maximum rows per row group
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .set_created_by(self.created_by.clone())
            .build()
    }
}

/// Parquet file writer
pub struct ParquetWriter {
    writer: ArrowWriter<File>,
    staging: PathBuf,
    target: PathBuf,
    rows_written: usize,
}

impl ParquetWriter {
    /// Create a writer for `path`, creating parent directories as needed
    pub fn create(
        path: impl AsRef<Path>,
        schema: SchemaRef,
        config: &ParquetWriterConfig,
    ) -> Result<Self> {
        let target = path.as_ref().to_path_buf();
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut staging = target.clone().into_os_string();
        staging.push(".partial");
        let staging = PathBuf::from(staging);

        let file = File::create(&staging).map_err(|e| {
            Error::output(format!("Failed to create {}: {e}", staging.display()))
        })?;
        let writer = ArrowWriter::try_new(file, schema, Some(config.build_properties()))?;

        Ok(Self {
            writer,
            staging,
            target,
            rows_written: 0,
        })
    }

    /// Write a RecordBatch
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch)?;
        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Rows written so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Finalize the file and move it to its target path
    pub fn close(self) -> Result<usize> {
        let Self {
            writer,
            staging,
            target,
            rows_written,
        } = self;

        if let Err(e) = writer.close() {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        std::fs::rename(&staging, &target).map_err(|e| {
            Error::output(format!("Failed to move artifact to {}: {e}", target.display()))
        })?;
        Ok(rows_written)
    }
}

/// Write a single RecordBatch to a Parquet file, returning the row count
pub fn write_batch_to_parquet(
    path: impl AsRef<Path>,
    batch: &RecordBatch,
    config: &ParquetWriterConfig,
) -> Result<usize> {
    let mut writer = ParquetWriter::create(path, batch.schema(), config)?;
    writer.write(batch)?;
    writer.close()
}
