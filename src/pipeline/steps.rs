//! The four standard steps

use super::types::{Step, StepOutput};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::fetch::{DatasetRef, KaggleClient};
use crate::publish::{ObjectDestination, Uploader};
use crate::register::{TableResource, WarehouseClient};
use crate::transform::{transform_directory, TransformOptions};
use async_trait::async_trait;
use std::path::PathBuf;

/// Download and unpack the dataset
pub const EXTRACT_STEP: &str = "YT_Extract_Data";
/// Merge the regional files into the Parquet artifact
pub const TRANSFORM_STEP: &str = "Conv_csv_to_parquet";
/// Upload the artifact
pub const PUBLISH_STEP: &str = "load_parquet_to_gcs";
/// Create the external table
pub const REGISTER_STEP: &str = "bq_YT_external_table_task";

/// Standard step order
pub const STEP_NAMES: [&str; 4] = [EXTRACT_STEP, TRANSFORM_STEP, PUBLISH_STEP, REGISTER_STEP];

// ============================================================================
// Extract
// ============================================================================

/// Fetches the dataset archive into the working directory
#[derive(Debug)]
pub struct ExtractStep {
    client: KaggleClient,
    dataset: DatasetRef,
    dest: PathBuf,
}

impl ExtractStep {
    /// Create the step
    pub fn new(client: KaggleClient, dataset: DatasetRef, dest: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dataset,
            dest: dest.into(),
        }
    }

    /// Wire the step from settings
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let username = config
            .kaggle_username
            .clone()
            .ok_or_else(|| Error::missing_field("kaggleUsername"))?;
        let key = config
            .kaggle_key
            .clone()
            .ok_or_else(|| Error::missing_field("kaggleKey"))?;
        let client = KaggleClient::new(config.endpoints.kaggle_api.clone(), username, key)?;

        Ok(Self::new(
            client,
            DatasetRef::parse(&config.dataset_ref)?,
            config.local_path().to_path_buf(),
        ))
    }
}

#[async_trait]
impl Step for ExtractStep {
    fn name(&self) -> &str {
        EXTRACT_STEP
    }

    async fn run(&self) -> Result<StepOutput> {
        let output = self.client.fetch(&self.dataset, &self.dest).await?;
        Ok(StepOutput::Fetched(output))
    }
}

// ============================================================================
// Transform
// ============================================================================

/// Builds the Parquet artifact from the working directory
#[derive(Debug, Clone)]
pub struct TransformStep {
    input_dir: PathBuf,
    output: PathBuf,
    options: TransformOptions,
}

impl TransformStep {
    /// Create the step with default options
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: output.into(),
            options: TransformOptions::default(),
        }
    }

    /// Replace the transform options
    #[must_use]
    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    /// Wire the step from settings
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.local_path().to_path_buf(), config.artifact_path())
    }
}

#[async_trait]
impl Step for TransformStep {
    fn name(&self) -> &str {
        TRANSFORM_STEP
    }

    async fn run(&self) -> Result<StepOutput> {
        let step = self.clone();
        let report = tokio::task::spawn_blocking(move || {
            transform_directory(&step.input_dir, &step.output, &step.options)
        })
        .await
        .map_err(|e| Error::Other(format!("Transform task failed: {e}")))??;
        Ok(StepOutput::Transformed(report))
    }
}

// ============================================================================
// Publish
// ============================================================================

/// Uploads the artifact to object storage
#[derive(Debug)]
pub struct PublishStep {
    uploader: Uploader,
    file: PathBuf,
    key: String,
}

impl PublishStep {
    /// Create the step
    pub fn new(uploader: Uploader, file: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            uploader,
            file: file.into(),
            key: key.into(),
        }
    }

    /// Wire the step from settings, uploading to the configured bucket
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let destination =
            ObjectDestination::gcs(config.bucket()?, config.google_credentials.as_deref())?;
        Ok(Self::from_config_with_destination(config, destination))
    }

    /// Wire the step from settings with an explicit destination
    pub fn from_config_with_destination(config: &PipelineConfig, destination: ObjectDestination) -> Self {
        Self::new(
            Uploader::new(destination),
            config.artifact_path(),
            config.object_key(),
        )
    }
}

#[async_trait]
impl Step for PublishStep {
    fn name(&self) -> &str {
        PUBLISH_STEP
    }

    async fn run(&self) -> Result<StepOutput> {
        let report = self.uploader.upload_file(&self.file, &self.key).await?;
        Ok(StepOutput::Published(report))
    }
}

// ============================================================================
// Register
// ============================================================================

/// Creates the external table over the uploaded artifact
#[derive(Debug)]
pub struct RegisterStep {
    client: WarehouseClient,
    table: TableResource,
}

impl RegisterStep {
    /// Create the step
    pub fn new(client: WarehouseClient, table: TableResource) -> Self {
        Self { client, table }
    }

    /// Wire the step from settings
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let table = TableResource::external_parquet(
            config.project()?,
            config.dataset_id(),
            config.table_id.clone(),
            config.source_uri(),
        );
        Ok(Self::new(WarehouseClient::from_config(config)?, table))
    }
}

#[async_trait]
impl Step for RegisterStep {
    fn name(&self) -> &str {
        REGISTER_STEP
    }

    async fn run(&self) -> Result<StepOutput> {
        let info = self.client.create_external_table(&self.table).await?;
        Ok(StepOutput::Registered(info))
    }
}

/// Build one standard step by name
pub fn build_step(config: &PipelineConfig, name: &str) -> Result<Box<dyn Step>> {
    let step: Box<dyn Step> = match name {
        EXTRACT_STEP => Box::new(ExtractStep::from_config(config)?),
        TRANSFORM_STEP => Box::new(TransformStep::from_config(config)),
        PUBLISH_STEP => Box::new(PublishStep::from_config(config)?),
        REGISTER_STEP => Box::new(RegisterStep::from_config(config)?),
        other => {
            return Err(Error::UnknownStep {
                step: other.to_string(),
            })
        }
    };
    Ok(step)
}
