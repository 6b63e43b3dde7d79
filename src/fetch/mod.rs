//! Fetch step
//!
//! Downloads a dataset archive from the hub and unpacks it into the local
//! working directory.

mod archive;
mod client;
mod dataset;

pub use archive::extract_archive;
pub use client::{FetchOutput, KaggleClient};
pub use dataset::DatasetRef;
