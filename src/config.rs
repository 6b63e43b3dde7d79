//! Pipeline configuration
//!
//! All process-wide settings (credentials, bucket, project and dataset
//! names) live in one [`PipelineConfig`] that is built once, validated, and
//! passed into the pipeline at construction time.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Defaults
// ============================================================================

/// Dataset downloaded from the hub
pub const DEFAULT_DATASET_REF: &str = "rsrishav/youtube-trending-video-dataset";

/// BigQuery dataset used when `BIGQUERY_DATASET` is unset
pub const DEFAULT_BIGQUERY_DATASET: &str = "YT_Trending_data_all";

/// Object key prefix inside the bucket
pub const DEFAULT_OBJECT_PREFIX: &str = "YT_Data/";

/// Name of the columnar artifact
pub const DEFAULT_PARQUET_FILE: &str = "All_YT_Data.parquet";

/// External table created in the warehouse
pub const DEFAULT_TABLE_ID: &str = "YT_external_table_data";

/// Local working directory
pub const DEFAULT_LOCAL_PATH: &str = "data";

/// Kaggle public API
pub const DEFAULT_KAGGLE_API: &str = "https://www.kaggle.com";

/// BigQuery REST API
pub const DEFAULT_BIGQUERY_API: &str = "https://bigquery.googleapis.com";

/// Environment variable names
pub mod env {
    pub const GCS_BUCKET: &str = "GCP_GCS_BUCKET";
    pub const PROJECT_ID: &str = "GCP_PROJECT_ID";
    pub const BIGQUERY_DATASET: &str = "BIGQUERY_DATASET";
    pub const KAGGLE_USERNAME: &str = "KAGGLE_USERNAME";
    pub const KAGGLE_KEY: &str = "KAGGLE_KEY";
    pub const LOCAL_PATH: &str = "YT_LOCAL_PATH";
    pub const GOOGLE_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
    pub const ACCESS_TOKEN: &str = "GCP_ACCESS_TOKEN";
}

// ============================================================================
// Endpoints
// ============================================================================

/// Base URLs of the remote services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoints {
    /// Dataset hub API base URL
    pub kaggle_api: String,
    /// Warehouse API base URL
    pub bigquery_api: String,
    /// Overrides the token URI from the service account key
    pub token_uri: Option<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            kaggle_api: DEFAULT_KAGGLE_API.to_string(),
            bigquery_api: DEFAULT_BIGQUERY_API.to_string(),
            token_uri: None,
        }
    }
}

// ============================================================================
// Pipeline Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Destination bucket for the columnar artifact
    pub gcs_bucket: Option<String>,
    /// Warehouse project
    pub project_id: Option<String>,
    /// Warehouse dataset (see [`PipelineConfig::dataset_id`])
    pub dataset_id: Option<String>,
    /// Dataset hub username
    pub kaggle_username: Option<String>,
    /// Dataset hub API key
    pub kaggle_key: Option<String>,
    /// Local working directory (see [`PipelineConfig::local_path`])
    pub local_path: Option<PathBuf>,

    /// Dataset identifier on the hub (`owner/name`)
    pub dataset_ref: String,
    /// Object key prefix
    pub object_prefix: String,
    /// Artifact file name
    pub parquet_file: String,
    /// External table name
    pub table_id: String,
    /// Service account key file for GCS and BigQuery
    pub google_credentials: Option<PathBuf>,
    /// Pre-issued OAuth2 access token for BigQuery
    pub access_token: Option<String>,
    /// Remote service endpoints
    pub endpoints: Endpoints,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gcs_bucket: None,
            project_id: None,
            dataset_id: None,
            kaggle_username: None,
            kaggle_key: None,
            local_path: None,
            dataset_ref: DEFAULT_DATASET_REF.to_string(),
            object_prefix: DEFAULT_OBJECT_PREFIX.to_string(),
            parquet_file: DEFAULT_PARQUET_FILE.to_string(),
            table_id: DEFAULT_TABLE_ID.to_string(),
            google_credentials: None,
            access_token: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a config with default settings and no credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_lookup(lookup);
        config
    }

    /// Load a YAML config file, filling unset fields from the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_lookup(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a YAML config string
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Fill fields that are still unset from `lookup`
    ///
    /// Values already present win over the lookup, so a config file can
    /// pin a field while the environment supplies secrets.
    fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        fill(&mut self.gcs_bucket, get(env::GCS_BUCKET));
        fill(&mut self.project_id, get(env::PROJECT_ID));
        fill(&mut self.kaggle_username, get(env::KAGGLE_USERNAME));
        fill(&mut self.kaggle_key, get(env::KAGGLE_KEY));
        fill(&mut self.access_token, get(env::ACCESS_TOKEN));

        fill(&mut self.dataset_id, get(env::BIGQUERY_DATASET));

        if self.google_credentials.is_none() {
            self.google_credentials = get(env::GOOGLE_CREDENTIALS).map(PathBuf::from);
        }
        if self.local_path.is_none() {
            self.local_path = get(env::LOCAL_PATH).map(PathBuf::from);
        }
    }

    // ------------------------------------------------------------------------
    // Builder-style setters
    // ------------------------------------------------------------------------

    /// Set the destination bucket
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.gcs_bucket = Some(bucket.into());
        self
    }

    /// Set the warehouse project
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project_id = Some(project.into());
        self
    }

    /// Set the warehouse dataset
    #[must_use]
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset_id = Some(dataset.into());
        self
    }

    /// Set the dataset hub credentials
    #[must_use]
    pub fn with_kaggle_credentials(
        mut self,
        username: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.kaggle_username = Some(username.into());
        self.kaggle_key = Some(key.into());
        self
    }

    /// Set the local working directory
    #[must_use]
    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    /// Set a pre-issued warehouse access token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the remote endpoints
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Check that every required field is present
    ///
    /// Fails on the first missing field so the pipeline never starts with
    /// a config that would only break inside a later step.
    pub fn validate(&self) -> Result<()> {
        require("gcsBucket", self.gcs_bucket.as_deref())?;
        require("projectId", self.project_id.as_deref())?;
        require("datasetId", Some(self.dataset_id()))?;
        require("kaggleUsername", self.kaggle_username.as_deref())?;
        require("kaggleKey", self.kaggle_key.as_deref())?;

        if self.local_path().as_os_str().is_empty() {
            return Err(Error::missing_field("localPath"));
        }
        if self.parquet_file.trim().is_empty() {
            return Err(Error::invalid_value("parquetFile", "must not be empty"));
        }
        if self.table_id.trim().is_empty() {
            return Err(Error::invalid_value("tableId", "must not be empty"));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Derived values
    // ------------------------------------------------------------------------

    /// Bucket name, or a missing-field error
    pub fn bucket(&self) -> Result<&str> {
        require("gcsBucket", self.gcs_bucket.as_deref())
    }

    /// Warehouse project, or a missing-field error
    pub fn project(&self) -> Result<&str> {
        require("projectId", self.project_id.as_deref())
    }

    /// Warehouse dataset, defaulting to `YT_Trending_data_all`
    pub fn dataset_id(&self) -> &str {
        self.dataset_id.as_deref().unwrap_or(DEFAULT_BIGQUERY_DATASET)
    }

    /// Local working directory, defaulting to `data`
    pub fn local_path(&self) -> &Path {
        self.local_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_LOCAL_PATH))
    }

    /// Object key of the uploaded artifact (`prefix + file name`)
    pub fn object_key(&self) -> String {
        format!("{}{}", self.object_prefix, self.parquet_file)
    }

    /// Local path of the columnar artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.local_path().join(&self.parquet_file)
    }

    /// Storage URI the external table points at
    pub fn source_uri(&self) -> String {
        format!(
            "gs://{}/{}",
            self.gcs_bucket.as_deref().unwrap_or_default(),
            self.object_key()
        )
    }

    /// Config as JSON with secrets masked, for display
    pub fn to_masked_json(&self) -> serde_json::Value {
        let mut masked = self.clone();
        masked.dataset_id = Some(self.dataset_id().to_string());
        masked.local_path = Some(self.local_path().to_path_buf());
        mask(&mut masked.kaggle_key);
        mask(&mut masked.access_token);
        serde_json::to_value(masked).unwrap_or_default()
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.as_deref().map_or(true, str::is_empty) {
        if let Some(value) = value {
            *slot = Some(value);
        }
    }
}

fn require<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::missing_field(field)),
    }
}

fn mask(value: &mut Option<String>) {
    if value.is_some() {
        *value = Some("********".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (env::GCS_BUCKET, "yt-bucket"),
            (env::PROJECT_ID, "yt-project"),
            (env::KAGGLE_USERNAME, "alice"),
            (env::KAGGLE_KEY, "secret"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.dataset_id(), "YT_Trending_data_all");
        assert_eq!(config.local_path(), Path::new("data"));
        assert_eq!(config.object_key(), "YT_Data/All_YT_Data.parquet");
        assert_eq!(config.table_id, "YT_external_table_data");
        assert_eq!(
            config.dataset_ref,
            "rsrishav/youtube-trending-video-dataset"
        );
    }

    #[test]
    fn test_from_lookup_complete() {
        let config = PipelineConfig::from_lookup(lookup_from(&full_env()));
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket().unwrap(), "yt-bucket");
        assert_eq!(config.project().unwrap(), "yt-project");
        assert_eq!(
            config.source_uri(),
            "gs://yt-bucket/YT_Data/All_YT_Data.parquet"
        );
    }

    #[test]
    fn test_dataset_override_from_env() {
        let mut vars = full_env();
        vars.push((env::BIGQUERY_DATASET, "custom_ds"));
        vars.push((env::LOCAL_PATH, "/tmp/yt"));
        let config = PipelineConfig::from_lookup(lookup_from(&vars));
        assert_eq!(config.dataset_id(), "custom_ds");
        assert_eq!(
            config.artifact_path(),
            PathBuf::from("/tmp/yt/All_YT_Data.parquet")
        );
    }

    #[test]
    fn test_missing_bucket_fails_fast() {
        let vars: Vec<_> = full_env()
            .into_iter()
            .filter(|(k, _)| *k != env::GCS_BUCKET)
            .collect();
        let config = PipelineConfig::from_lookup(lookup_from(&vars));

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "gcsBucket"));
        // Without validation the bucket silently falls back to empty
        assert_eq!(config.source_uri(), "gs:///YT_Data/All_YT_Data.parquet");
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut vars = full_env();
        vars.retain(|(k, _)| *k != env::KAGGLE_KEY);
        vars.push((env::KAGGLE_KEY, ""));
        let config = PipelineConfig::from_lookup(lookup_from(&vars));
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required config field: kaggleKey");
    }

    #[test]
    fn test_yaml_config_camel_case() {
        let yaml = r"
gcsBucket: from-file
projectId: proj
datasetId: ds
kaggleUsername: bob
kaggleKey: k
localPath: /work
endpoints:
  kaggleApi: http://localhost:1234
";
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.gcs_bucket.as_deref(), Some("from-file"));
        assert_eq!(config.dataset_id(), "ds");
        assert_eq!(config.local_path(), Path::new("/work"));
        assert_eq!(config.endpoints.kaggle_api, "http://localhost:1234");
        assert_eq!(config.endpoints.bigquery_api, DEFAULT_BIGQUERY_API);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_values_win_over_lookup() {
        let mut config = PipelineConfig::from_yaml("gcsBucket: pinned").unwrap();
        config.apply_lookup(lookup_from(&full_env()));
        assert_eq!(config.gcs_bucket.as_deref(), Some("pinned"));
        assert_eq!(config.kaggle_username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_pinned_default_value_wins_over_lookup() {
        let mut config = PipelineConfig::from_yaml(
            "datasetId: YT_Trending_data_all\nlocalPath: data\n",
        )
        .unwrap();
        let mut vars = full_env();
        vars.push((env::BIGQUERY_DATASET, "from_env"));
        vars.push((env::LOCAL_PATH, "/from/env"));
        config.apply_lookup(lookup_from(&vars));

        assert_eq!(config.dataset_id(), "YT_Trending_data_all");
        assert_eq!(config.local_path(), Path::new("data"));
    }

    #[test]
    fn test_masked_json_hides_secrets() {
        let config = PipelineConfig::from_lookup(lookup_from(&full_env()))
            .with_access_token("ya29.token");
        let json = config.to_masked_json();
        assert_eq!(json["kaggleKey"], "********");
        assert_eq!(json["accessToken"], "********");
        assert_eq!(json["kaggleUsername"], "alice");
    }
}
