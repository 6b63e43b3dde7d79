//! Output module
//!
//! Turns a [`Frame`](crate::frame::Frame) into a typed Arrow RecordBatch
//! through an explicit [`OutputSchema`] and writes it as Parquet.

mod reader;
mod schema;
mod writer;

pub use reader::{batches_to_json, read_parquet, read_parquet_summary, ParquetSummary};
pub use schema::{parse_bool, parse_date, parse_int, parse_timestamp, ColumnKind, ColumnSpec, OutputSchema};
pub use writer::{write_batch_to_parquet, ParquetWriter, ParquetWriterConfig};
