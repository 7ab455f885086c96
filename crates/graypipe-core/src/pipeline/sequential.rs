//! Sequential runner: one item at a time, one flow of control.
//!
//! Baseline for the concurrent runner. Useful when debugging or when output
//! order must follow input order.

use std::path::PathBuf;
use std::time::Instant;

use super::shutdown::ShutdownSignal;
use super::stages::{StageContext, LOAD};
use crate::types::{ExecutionMode, RunSummary};

/// Processes a batch without any hand-off between tasks.
#[derive(Clone)]
pub struct SequentialRunner {
    ctx: StageContext,
}

impl SequentialRunner {
    pub fn new(ctx: StageContext) -> Self {
        Self { ctx }
    }

    /// Process `paths` in order. Blocks the calling thread.
    ///
    /// The shutdown signal is checked between items; the item in progress is
    /// always finished.
    pub fn run(&self, paths: &[PathBuf], shutdown: &ShutdownSignal) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::new(ExecutionMode::Sequential, paths.len());

        for path in paths {
            if shutdown.is_triggered() {
                tracing::warn!("Shutdown requested, stopping before {}", path.display());
                summary.interrupted = true;
                break;
            }

            let item = match self.ctx.load(path.clone()) {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!("[{}] {}", LOAD, e);
                    summary.skipped += 1;
                    continue;
                }
            };
            summary.loaded += 1;

            let item = self.ctx.grayscale(self.ctx.resize(item));
            let outcome = self.ctx.save(item);
            summary.record(&outcome);
        }

        summary.set_elapsed(start.elapsed());
        summary
    }
}
