//! Pipeline module
//!
//! A pipeline is an ordered list of named [`Step`]s run one after another
//! on the current tokio runtime. The first failing step stops the run and
//! its error comes back wrapped in [`Error::Step`].

mod steps;
mod types;

pub use steps::{
    build_step, ExtractStep, PublishStep, RegisterStep, TransformStep, EXTRACT_STEP,
    PUBLISH_STEP, REGISTER_STEP, STEP_NAMES, TRANSFORM_STEP,
};
pub use types::{PipelineReport, Step, StepOutput, StepRecord};

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use std::time::Instant;
use tracing::{error, info};

/// Ordered list of steps
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `config` and wire the four standard steps
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Self::from_config_steps(config, &STEP_NAMES)
    }

    /// Wire only the named standard steps
    ///
    /// The full config is not validated; each step checks the fields it
    /// needs when it is built.
    pub fn from_config_steps(config: &PipelineConfig, names: &[&str]) -> Result<Self> {
        let mut pipeline = Self::new();
        for name in names {
            pipeline.steps.push(build_step(config, name)?);
        }
        Ok(pipeline)
    }

    /// Append a step
    #[must_use]
    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append an already boxed step
    #[must_use]
    pub fn with_boxed_step(mut self, step: Box<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }

    /// Step names in run order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, stopping at the first failure
    pub async fn run(&self) -> Result<PipelineReport> {
        let start = Instant::now();
        let mut report = PipelineReport::new();

        info!(steps = self.steps.len(), "Starting pipeline");
        for step in &self.steps {
            report.steps.push(run_one(step.as_ref()).await?);
        }

        report.duration_ms = elapsed_ms(start);
        info!(duration_ms = report.duration_ms, "Pipeline finished");
        Ok(report)
    }

    /// Run a single step by name
    pub async fn run_step(&self, name: &str) -> Result<StepRecord> {
        let step = self
            .steps
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| Error::UnknownStep {
                step: name.to_string(),
            })?;
        run_one(step.as_ref()).await
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}

async fn run_one(step: &dyn Step) -> Result<StepRecord> {
    let name = step.name().to_string();
    let start = Instant::now();
    info!(step = %name, "Starting step");

    match step.run().await {
        Ok(output) => {
            let duration_ms = elapsed_ms(start);
            info!(step = %name, duration_ms, "{}", output.summary());
            Ok(StepRecord {
                name,
                output,
                duration_ms,
            })
        }
        Err(e) => {
            error!(step = %name, error = %e, "Step failed");
            Err(Error::step(name, e))
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
