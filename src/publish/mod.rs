//! Publish step
//!
//! Uploads the local artifact to object storage. Small files go up in one
//! request. Anything larger than the threshold is sent as a multipart
//! upload of fixed-size parts.

mod destination;
mod uploader;

pub use destination::ObjectDestination;
pub use uploader::{UploadOptions, UploadReport, Uploader, DEFAULT_CHUNK_SIZE};

#[cfg(test)]
mod tests;
