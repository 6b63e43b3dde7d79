//! Chunked artifact upload

use super::destination::ObjectDestination;
use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use object_store::{MultipartUpload, PutPayload};
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

/// Default part size and single-request threshold: 5 MiB
pub const DEFAULT_CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Upload tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Size of each multipart part (the last part holds the remainder)
    pub chunk_size: usize,
    /// Files up to this size go up in a single request
    pub multipart_threshold: usize,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            multipart_threshold: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Outcome of one upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    /// Object URI
    pub uri: String,
    /// Bytes uploaded
    pub bytes: u64,
    /// Requests used: 1 for a single put, else the number of parts
    pub parts: usize,
}

/// Uploads local files to an [`ObjectDestination`]
#[derive(Debug, Clone)]
pub struct Uploader {
    destination: ObjectDestination,
    options: UploadOptions,
}

impl Uploader {
    /// Create an uploader with the default 5 MiB chunking
    pub fn new(destination: ObjectDestination) -> Self {
        Self::with_options(destination, UploadOptions::default())
    }

    /// Create an uploader with custom chunking
    pub fn with_options(destination: ObjectDestination, options: UploadOptions) -> Self {
        Self {
            destination,
            options: UploadOptions {
                chunk_size: options.chunk_size.max(1),
                ..options
            },
        }
    }

    /// Upload `file` to `key`, replacing any existing object
    pub async fn upload_file(&self, file: &Path, key: &str) -> Result<UploadReport> {
        let size = tokio::fs::metadata(file)
            .await
            .map_err(|_| Error::FileNotFound {
                path: file.display().to_string(),
            })?
            .len();
        let location = ObjectPath::parse(key)
            .map_err(|e| Error::invalid_value("objectKey", e.to_string()))?;
        let uri = self.destination.uri(key);

        info!(file = %file.display(), uri = %uri, bytes = size, "Uploading artifact");

        let parts = if size <= self.options.multipart_threshold as u64 {
            let data = tokio::fs::read(file).await?;
            self.destination
                .store()
                .put(&location, PutPayload::from(Bytes::from(data)))
                .await?;
            1
        } else {
            self.upload_multipart(file, &location).await?
        };

        info!(uri = %uri, parts, "Upload complete");
        Ok(UploadReport {
            uri,
            bytes: size,
            parts,
        })
    }

    async fn upload_multipart(&self, file: &Path, location: &ObjectPath) -> Result<usize> {
        let mut upload = self.destination.store().put_multipart(location).await?;

        match self.send_parts(file, upload.as_mut()).await {
            Ok(parts) => {
                upload.complete().await?;
                Ok(parts)
            }
            Err(e) => {
                if let Err(abort_err) = upload.abort().await {
                    warn!(error = %abort_err, "Failed to abort multipart upload");
                }
                Err(e)
            }
        }
    }

    async fn send_parts(&self, file: &Path, upload: &mut dyn MultipartUpload) -> Result<usize> {
        let mut reader = tokio::fs::File::open(file).await?;
        let mut parts = 0;

        loop {
            let chunk = read_chunk(&mut reader, self.options.chunk_size).await?;
            if chunk.is_empty() {
                break;
            }
            parts += 1;
            debug!(part = parts, bytes = chunk.len(), "Uploading part");
            upload.put_part(PutPayload::from(Bytes::from(chunk))).await?;
        }

        Ok(parts)
    }
}

/// Read up to `size` bytes, short only at end of file
async fn read_chunk(reader: &mut tokio::fs::File, size: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; size];
    let mut filled = 0;
    while filled < size {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    Ok(buf)
}
