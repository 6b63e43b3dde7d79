//! Auth configuration types

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// OAuth2 scope covering both GCS and BigQuery
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Default Google token endpoint
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password (API key)
        password: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Service account JWT exchanged for an access token
    ServiceAccount {
        /// Service account email (iss claim)
        client_email: String,
        /// Private key for signing (PEM format)
        private_key: String,
        /// Token endpoint the signed JWT is posted to
        token_uri: String,
        /// Requested scopes
        scopes: Vec<String>,
        /// Token lifetime in seconds
        token_lifetime_seconds: u64,
    },
}

impl AuthConfig {
    /// Build service account auth from a parsed key file
    pub fn service_account(key: ServiceAccountKey) -> Self {
        Self::ServiceAccount {
            client_email: key.client_email,
            private_key: key.private_key,
            token_uri: key.token_uri.unwrap_or_else(|| GOOGLE_TOKEN_URI.to_string()),
            scopes: vec![CLOUD_PLATFORM_SCOPE.to_string()],
            token_lifetime_seconds: 3600,
        }
    }

    /// Whether requests go out with credentials attached
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthConfig::None)
    }
}

/// The subset of a Google service account key file we use
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account email
    pub client_email: String,
    /// PEM-encoded RSA private key
    pub private_key: String,
    /// Token endpoint
    #[serde(default)]
    pub token_uri: Option<String>,
    /// Owning project
    #[serde(default)]
    pub project_id: Option<String>,
}

impl ServiceAccountKey {
    /// Parse a key from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Auth {
            message: format!("Invalid service account key: {e}"),
        })
    }

    /// Read and parse a key file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Auth {
            message: format!(
                "Failed to read service account key '{}': {e}",
                path.display()
            ),
        })?;
        Self::from_json(&content)
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
