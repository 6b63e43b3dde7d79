//! Decoder types and traits
//!
//! Defines the text encoding handling and the decoder abstraction.

use crate::error::{Error, Result};
use std::borrow::Cow;

/// Text encoding applied to raw file bytes before parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// ISO-8859-1: every byte maps to the code point of the same value
    #[default]
    Latin1,
    /// Strict UTF-8
    Utf8,
}

impl TextEncoding {
    /// Decode bytes into text
    pub fn decode<'a>(self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        match self {
            TextEncoding::Latin1 => {
                if bytes.is_ascii() {
                    // ASCII is valid UTF-8 and maps to itself under Latin-1
                    Ok(Cow::Borrowed(std::str::from_utf8(bytes).unwrap_or_default()))
                } else {
                    Ok(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()))
                }
            }
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|e| Error::decode("text", format!("Invalid UTF-8: {e}"))),
        }
    }
}

/// Trait for decoding file contents into records
pub trait RecordDecoder: Send + Sync {
    /// Decoded form
    type Output;

    /// Decode text into records
    fn decode(&self, body: &str) -> Result<Self::Output>;

    /// Decode raw bytes, applying a text encoding first
    fn decode_bytes(&self, bytes: &[u8], encoding: TextEncoding) -> Result<Self::Output> {
        let text = encoding.decode(bytes)?;
        self.decode(&text)
    }
}
