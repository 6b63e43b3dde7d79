//! Authentication module
//!
//! Supports: Basic (dataset hub), Bearer, and Google service accounts
//! (signed JWT exchanged for an access token).
//!
//! The `Authenticator` applies credentials to outgoing requests and caches
//! service account tokens until they expire.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{
    AuthConfig, CachedToken, ServiceAccountKey, CLOUD_PLATFORM_SCOPE, GOOGLE_TOKEN_URI,
};
