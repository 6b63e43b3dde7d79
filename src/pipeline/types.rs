//! Pipeline types
//!
//! The step abstraction and the records a run produces.

use crate::error::Result;
use crate::fetch::FetchOutput;
use crate::publish::UploadReport;
use crate::register::TableInfo;
use crate::transform::TransformReport;
use async_trait::async_trait;
use serde::Serialize;

/// One named unit of work
///
/// Steps exchange data through declared file paths and object keys, never
/// through shared memory. The returned [`StepOutput`] is for reporting.
#[async_trait]
pub trait Step: Send + Sync {
    /// Step name, unique within a pipeline
    fn name(&self) -> &str;

    /// Execute the step
    async fn run(&self) -> Result<StepOutput>;
}

/// What a step produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutput {
    /// Dataset downloaded and unpacked
    Fetched(FetchOutput),
    /// Artifact written
    Transformed(TransformReport),
    /// Artifact uploaded
    Published(UploadReport),
    /// External table created
    Registered(TableInfo),
}

impl StepOutput {
    /// One-line description for logs and CLI output
    pub fn summary(&self) -> String {
        match self {
            StepOutput::Fetched(out) => {
                format!("{} files unpacked into {}", out.files.len(), out.dir.display())
            }
            StepOutput::Transformed(report) => format!(
                "{} rows from {} CSV and {} JSON files ({} categories) -> {}",
                report.rows,
                report.tabular_files,
                report.nested_files,
                report.categories,
                report.output.display()
            ),
            StepOutput::Published(report) => format!(
                "{} bytes in {} part(s) -> {}",
                report.bytes, report.parts, report.uri
            ),
            StepOutput::Registered(info) => {
                let r = &info.table_reference;
                format!("table {}.{}.{} created", r.project_id, r.dataset_id, r.table_id)
            }
        }
    }
}

/// A finished step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Step name
    pub name: String,
    /// Step result
    pub output: StepOutput,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

/// Result of a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    /// Finished steps, in run order
    pub steps: Vec<StepRecord>,
    /// Total wall time in milliseconds
    pub duration_ms: u64,
}

impl PipelineReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Output of a step by name
    pub fn output(&self, name: &str) -> Option<&StepOutput> {
        self.steps
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.output)
    }

    /// Names of the steps that ran
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}
