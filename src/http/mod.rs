//! HTTP client module
//!
//! Shared client for the dataset hub and the warehouse API.

mod client;

pub use client::{HttpClient, HttpClientConfig, RequestConfig};
