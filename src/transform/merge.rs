//! Directory merge
//!
//! Reads every regional file in the working directory into one tabular
//! frame and one list of category entries.

use crate::decode::{CsvDecoder, JsonDecoder, RecordDecoder, TextEncoding};
use crate::error::{Error, Result};
use crate::frame::Frame;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Envelope holding the category entries in each JSON file
pub const CATEGORY_ENVELOPE: &str = "items";

/// Everything read from one directory
#[derive(Debug, Clone, Default)]
pub struct MergedInput {
    /// Concatenated CSV rows
    pub frame: Frame,
    /// Concatenated category entries, duplicates included
    pub categories: Vec<Value>,
    /// Number of `.csv` files read
    pub tabular_files: usize,
    /// Number of `.json` files read
    pub nested_files: usize,
}

/// Merge all `.csv` and `.json` files directly inside `dir`
///
/// Files are visited in directory listing order and subdirectories are not
/// descended into. Files with other extensions are skipped.
pub fn merge_directory(dir: &Path, encoding: TextEncoding) -> Result<MergedInput> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound {
            path: dir.display().to_string(),
        });
    }

    let csv = CsvDecoder::new();
    let json = JsonDecoder::with_path(CATEGORY_ENVELOPE);
    let mut merged = MergedInput::default();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let is_csv = file_name.ends_with(".csv");
        let is_json = file_name.ends_with(".json");
        if !is_csv && !is_json {
            debug!(file = %file_name, "Skipping file");
            continue;
        }

        info!("Processing {file_name}...");
        let bytes = std::fs::read(&path)?;

        if is_csv {
            let frame = csv
                .decode_bytes(&bytes, encoding)
                .map_err(|e| Error::decode(&file_name, e.to_string()))?;
            debug!(file = %file_name, rows = frame.num_rows(), "Decoded CSV");
            merged.frame.concat(frame);
            merged.tabular_files += 1;
        } else {
            let entries = json.decode_bytes(&bytes, encoding).map_err(|e| match e {
                Error::RecordExtraction { path, message } => Error::RecordExtraction {
                    path,
                    message: format!("{message} ({file_name})"),
                },
                other => Error::decode(&file_name, other.to_string()),
            })?;
            debug!(file = %file_name, entries = entries.len(), "Decoded categories");
            merged.categories.extend(entries);
            merged.nested_files += 1;
        }
    }

    Ok(merged)
}
