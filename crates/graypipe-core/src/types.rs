//! Core data types for the graypipe pipeline.
//!
//! [`WorkItem`] is the value that moves between stages; [`ItemOutcome`],
//! [`StageStats`] and [`RunSummary`] describe what happened to it.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PipelineResult;

/// One image moving through the pipeline.
///
/// Only constructed after a successful decode, so every holder has a real
/// image. Not `Clone`: handing an item to the next stage moves it.
#[derive(Debug)]
pub struct WorkItem {
    source: PathBuf,
    destination: PathBuf,
    image: DynamicImage,
}

impl WorkItem {
    /// Create a work item from a decoded image and its derived destination.
    pub fn new(source: PathBuf, destination: PathBuf, image: DynamicImage) -> Self {
        Self {
            source,
            destination,
            image,
        }
    }

    /// Original input path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Path the processed image is written to.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Current image value.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Replace the image with the result of `f`, keeping both paths.
    pub fn map_image<F>(self, f: F) -> Self
    where
        F: FnOnce(DynamicImage) -> DynamicImage,
    {
        Self {
            image: f(self.image),
            ..self
        }
    }
}

/// Per-item signal emitted by the terminal save stage.
#[derive(Debug)]
pub struct ItemOutcome {
    /// Original input path
    pub source: PathBuf,
    /// Destination the item was written to (or failed to be written to)
    pub destination: PathBuf,
    /// Whether the write succeeded
    pub result: PipelineResult<()>,
}

impl ItemOutcome {
    /// Whether the item was written successfully.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Counters reported by a stage when it exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageStats {
    /// Stage name, used in log lines
    pub stage: &'static str,
    /// Items taken from the input channel
    pub received: usize,
    /// Items sent downstream
    pub forwarded: usize,
    /// Items that failed and were not forwarded
    pub dropped: usize,
}

impl StageStats {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            received: 0,
            forwarded: 0,
            dropped: 0,
        }
    }
}

/// How a batch is executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Staged pipeline with one task per stage
    #[default]
    Concurrent,
    /// One item at a time in a single flow of control
    Sequential,
}

impl ExecutionMode {
    /// Parse a mode string, falling back to [`ExecutionMode::Concurrent`]
    /// for anything other than "sequential".
    pub fn from_str_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "sequential" => ExecutionMode::Sequential,
            "concurrent" => ExecutionMode::Concurrent,
            other => {
                tracing::debug!("Unknown mode {:?}, using concurrent", other);
                ExecutionMode::Concurrent
            }
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Concurrent => write!(f, "concurrent"),
            ExecutionMode::Sequential => write!(f, "sequential"),
        }
    }
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Mode the batch ran in
    pub mode: ExecutionMode,
    /// Number of input paths given
    pub inputs: usize,
    /// Inputs that passed validation, decoded, and got a destination
    pub loaded: usize,
    /// Inputs skipped before entering the pipeline
    pub skipped: usize,
    /// Items written successfully
    pub saved: usize,
    /// Items that failed to write
    pub failed: usize,
    /// Whether the run stopped early on a shutdown request
    pub interrupted: bool,
    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn new(mode: ExecutionMode, inputs: usize) -> Self {
        Self {
            mode,
            inputs,
            loaded: 0,
            skipped: 0,
            saved: 0,
            failed: 0,
            interrupted: false,
            elapsed_ms: 0,
        }
    }

    /// Record the run's wall-clock duration.
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    }

    /// Fold one save-stage outcome into the counters.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        if outcome.is_success() {
            self.saved += 1;
        } else {
            self.failed += 1;
        }
    }
}
