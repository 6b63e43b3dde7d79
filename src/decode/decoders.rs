//! Decoder implementations
//!
//! Each decoder handles one input file format.

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use crate::frame::Frame;
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot-notation path to the records
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Extract records from a JSON value using the configured path
    ///
    /// A path that does not resolve is an error: an envelope without its
    /// records is not an empty file.
    fn extract_records(&self, value: Value) -> Result<Vec<Value>> {
        match &self.record_path {
            Some(path) => match lookup_path(&value, path) {
                Some(Value::Array(arr)) => Ok(arr.clone()),
                Some(v) => Ok(vec![v.clone()]),
                None => Err(Error::RecordExtraction {
                    path: path.clone(),
                    message: "path not found in document".to_string(),
                }),
            },
            None => match value {
                Value::Array(arr) => Ok(arr),
                other => Ok(vec![other]),
            },
        }
    }
}

impl RecordDecoder for JsonDecoder {
    type Output = Vec<Value>;

    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::decode("json", format!("Failed to parse JSON: {e}")))?;
        self.extract_records(value)
    }
}

// ============================================================================
// CSV Decoder
// ============================================================================

/// CSV decoder producing a [`Frame`]
///
/// The first row is the header. Quoted fields may contain delimiters and
/// newlines. Empty fields become null cells. Rows with a different field
/// count than the header are rejected, as is input with no header at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDecoder;

impl CsvDecoder {
    /// Create a new CSV decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for CsvDecoder {
    type Output = Frame;

    fn decode(&self, body: &str) -> Result<Frame> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(body.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(Error::decode("csv", "No columns to parse from file"));
        }
        let mut frame = Frame::new(columns);

        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect();
            frame.push_row(row)?;
        }

        Ok(frame)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolve a simple dot-notation path (`a.b`, `items[0].id`)
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].trim_end_matches(']');

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<usize>().ok()?;
            current = current.as_array()?.get(index)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current)
}
