//! Pipeline orchestration entry point: builds the collaborators from config
//! and dispatches a batch to the selected runner.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::types::{ExecutionMode, RunSummary};

use super::codec::{FsCodec, ImageCodec};
use super::concurrent::ConcurrentRunner;
use super::destination::{DestinationRule, DirectoryRewrite};
use super::discovery::FileDiscovery;
use super::sequential::SequentialRunner;
use super::shutdown::ShutdownSignal;
use super::stages::{blocking, StageContext};
use super::validate::Validator;

/// The main image processor.
#[derive(Clone)]
pub struct ImageProcessor {
    ctx: StageContext,
    mode: ExecutionMode,
    buffer_size: usize,
    discovery: FileDiscovery,
}

impl ImageProcessor {
    /// Create a processor using the filesystem codec and the configured
    /// directory rewrite.
    pub fn new(config: &Config) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(FsCodec::new(config.output.clone())),
            Arc::new(DirectoryRewrite::new(config.input_dir(), config.output_dir())),
        )
    }

    /// Create a processor with a custom codec and destination rule.
    pub fn with_collaborators(
        config: &Config,
        codec: Arc<dyn ImageCodec>,
        destination: Arc<dyn DestinationRule>,
    ) -> Self {
        Self {
            ctx: StageContext {
                codec,
                destination,
                validator: Validator::new(config.limits.clone()),
                max_dimension: config.resize.max_dimension,
            },
            mode: config.pipeline.execution_mode(),
            buffer_size: config.pipeline.buffer_size,
            discovery: FileDiscovery::default(),
        }
    }

    /// Mode used by [`run`](Self::run).
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Expand directory inputs into the image files beneath them.
    pub fn expand_inputs(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        self.discovery.expand(inputs)
    }

    /// Process a batch in the configured mode.
    pub async fn run(&self, paths: Vec<PathBuf>, shutdown: ShutdownSignal) -> Result<RunSummary> {
        self.run_with_mode(self.mode, paths, shutdown).await
    }

    /// Process a batch in an explicit mode.
    ///
    /// Per-item failures never fail the batch; they are counted in the
    /// returned summary.
    pub async fn run_with_mode(
        &self,
        mode: ExecutionMode,
        paths: Vec<PathBuf>,
        shutdown: ShutdownSignal,
    ) -> Result<RunSummary> {
        tracing::debug!("Processing {} input(s) in {} mode", paths.len(), mode);

        let summary = match mode {
            ExecutionMode::Concurrent => {
                ConcurrentRunner::new(self.ctx.clone(), self.buffer_size)
                    .run(paths, shutdown)
                    .await
            }
            ExecutionMode::Sequential => {
                let runner = SequentialRunner::new(self.ctx.clone());
                blocking("sequential", move || runner.run(&paths, &shutdown)).await?
            }
        };

        tracing::info!(
            "Processed {} input(s): {} saved, {} skipped, {} failed",
            summary.inputs,
            summary.saved,
            summary.skipped,
            summary.failed
        );
        tracing::info!("Execution time for mode '{}': {}ms", mode, summary.elapsed_ms);
        Ok(summary)
    }
}
