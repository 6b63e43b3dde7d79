//! Input decoder module
//!
//! Supports: CSV (into a [`Frame`](crate::frame::Frame)) and JSON with an
//! envelope path.
//!
//! Files are read as raw bytes and passed through a fixed [`TextEncoding`]
//! before parsing, so non-UTF-8 input never fails to decode.

mod decoders;
mod types;

pub use decoders::{lookup_path, CsvDecoder, JsonDecoder};
pub use types::{RecordDecoder, TextEncoding};
