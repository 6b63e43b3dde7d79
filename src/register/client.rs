//! Warehouse REST client

use super::table::{TableInfo, TableResource};
use crate::auth::{AuthConfig, ServiceAccountKey};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use reqwest::Method;
use tracing::info;

/// Client for the BigQuery tables API
#[derive(Debug)]
pub struct WarehouseClient {
    http: HttpClient,
}

impl WarehouseClient {
    /// Create a client against `api_base` with the given credentials
    pub fn new(api_base: impl Into<String>, auth: AuthConfig) -> Result<Self> {
        let config = HttpClientConfig::builder().base_url(api_base).build();
        Ok(Self {
            http: HttpClient::with_auth(config, auth)?,
        })
    }

    /// Create a client from pipeline settings
    ///
    /// A pre-issued access token wins over a service account key file.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.endpoints.bigquery_api.clone(), warehouse_auth(config)?)
    }

    /// Create an external table
    ///
    /// An existing table is not replaced: the warehouse answers 409, which
    /// surfaces as [`Error::HttpStatus`].
    pub async fn create_external_table(&self, table: &TableResource) -> Result<TableInfo> {
        let reference = &table.table_reference;
        let path = format!(
            "bigquery/v2/projects/{}/datasets/{}/tables",
            reference.project_id, reference.dataset_id
        );
        let body = serde_json::to_value(table)?;

        info!(table = %table.qualified_name(), "Creating external table");
        let created: TableInfo = self
            .http
            .request_json(Method::POST, &path, RequestConfig::new().json(body))
            .await?;

        info!(
            table = %table.qualified_name(),
            kind = created.table_type.as_deref().unwrap_or("unknown"),
            "External table created"
        );
        Ok(created)
    }
}

/// Credentials for the warehouse API
pub fn warehouse_auth(config: &PipelineConfig) -> Result<AuthConfig> {
    if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(AuthConfig::Bearer {
            token: token.to_string(),
        });
    }

    let Some(path) = &config.google_credentials else {
        return Err(Error::auth(
            "No warehouse credentials: set GOOGLE_APPLICATION_CREDENTIALS or GCP_ACCESS_TOKEN",
        ));
    };

    let mut auth = AuthConfig::service_account(ServiceAccountKey::from_file(path)?);
    if let (AuthConfig::ServiceAccount { token_uri, .. }, Some(custom)) =
        (&mut auth, &config.endpoints.token_uri)
    {
        token_uri.clone_from(custom);
    }
    Ok(auth)
}
