//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::output::{batches_to_json, read_parquet, read_parquet_summary};
use crate::pipeline::{
    build_step, Pipeline, PublishStep, EXTRACT_STEP, PUBLISH_STEP, REGISTER_STEP,
    TRANSFORM_STEP,
};
use crate::publish::ObjectDestination;
use serde_json::{json, Value};
use std::path::Path;
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run { to_dir } => self.run_pipeline(to_dir.as_deref()).await,
            Commands::Fetch => self.run_single(EXTRACT_STEP).await,
            Commands::Transform => self.run_single(TRANSFORM_STEP).await,
            Commands::Publish { to_dir: None } => self.run_single(PUBLISH_STEP).await,
            Commands::Publish {
                to_dir: Some(dir),
            } => self.publish_to_dir(dir).await,
            Commands::Register => self.run_single(REGISTER_STEP).await,
            Commands::Check => self.check(),
            Commands::Inspect { path, rows } => self.inspect(path, *rows),
        }
    }

    /// Load the config file if given, else the environment
    fn load_config(&self) -> Result<PipelineConfig> {
        match &self.cli.config {
            Some(path) => PipelineConfig::from_file(path),
            None => Ok(PipelineConfig::from_env()),
        }
    }

    /// Run every step
    async fn run_pipeline(&self, to_dir: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;

        let pipeline = match to_dir {
            None => Pipeline::from_config(&config)?,
            Some(dir) => {
                warn!(dir = %dir.display(), "Uploading to a local directory, table registration skipped");
                Pipeline::from_config_steps(&config, &[EXTRACT_STEP, TRANSFORM_STEP])?.with_step(
                    PublishStep::from_config_with_destination(&config, ObjectDestination::local(dir)?),
                )
            }
        };

        let report = pipeline.run().await?;
        self.output_message(&json!({
            "type": "PIPELINE_REPORT",
            "report": report
        }));
        Ok(())
    }

    /// Run one standard step
    async fn run_single(&self, name: &str) -> Result<()> {
        let config = self.load_config()?;
        let pipeline = Pipeline::new().with_boxed_step(build_step(&config, name)?);

        let record = pipeline.run_step(name).await?;
        self.output_message(&json!({
            "type": "STEP_RESULT",
            "step": record
        }));
        Ok(())
    }

    /// Upload the artifact into a local directory
    async fn publish_to_dir(&self, dir: &Path) -> Result<()> {
        let config = self.load_config()?;
        let step =
            PublishStep::from_config_with_destination(&config, ObjectDestination::local(dir)?);

        let record = Pipeline::new().with_step(step).run_step(PUBLISH_STEP).await?;
        self.output_message(&json!({
            "type": "STEP_RESULT",
            "step": record
        }));
        Ok(())
    }

    /// Validate the config
    fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let status = match config.validate() {
            Ok(()) => json!({"status": "VALID"}),
            Err(e) => json!({"status": "INVALID", "message": e.to_string()}),
        };

        self.output_message(&json!({
            "type": "CONFIG",
            "config": config.to_masked_json(),
            "validation": status,
            "objectKey": config.object_key(),
            "sourceUri": config.source_uri(),
            "artifactPath": config.artifact_path()
        }));

        config.validate()
    }

    /// Print what a Parquet file holds
    fn inspect(&self, path: &Path, rows: usize) -> Result<()> {
        let summary = read_parquet_summary(path)?;
        let columns: Vec<Value> = summary
            .columns()
            .into_iter()
            .map(|(name, data_type)| json!({"name": name, "type": data_type}))
            .collect();

        let mut message = json!({
            "type": "PARQUET_SUMMARY",
            "path": path,
            "rows": summary.num_rows,
            "rowGroups": summary.num_row_groups,
            "createdBy": summary.created_by,
            "columns": columns
        });

        if rows > 0 {
            let batches = read_parquet(path, Some(rows))?;
            message["sample"] = batches_to_json(&batches)?;
        }

        self.output_message(&message);
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
