//! Staged concurrent runner.
//!
//! ```text
//! paths → [source] → [load] → [resize] → [grayscale] → [save] → outcomes
//! ```
//!
//! Every arrow is a bounded channel and every box is its own task, so while
//! `save` writes item *i*, `grayscale` can already be converting item *i+1*.
//! Completion is observed by draining the outcome channel, which only closes
//! after every upstream stage has exited.

use std::path::PathBuf;
use std::time::Instant;

use tokio::task::JoinHandle;

use super::channel::{spawn_source, spawn_stage, spawn_terminal_stage};
use super::shutdown::ShutdownSignal;
use super::stages::{blocking, StageContext, GRAYSCALE, LOAD, RESIZE, SAVE};
use crate::types::{ExecutionMode, RunSummary, StageStats, WorkItem};

/// Runs a batch through the four-stage pipeline.
#[derive(Clone)]
pub struct ConcurrentRunner {
    ctx: StageContext,
    buffer_size: usize,
}

impl ConcurrentRunner {
    /// `buffer_size` is the capacity of every hand-off channel.
    pub fn new(ctx: StageContext, buffer_size: usize) -> Self {
        Self {
            ctx,
            buffer_size: buffer_size.max(1),
        }
    }

    /// Process `paths` and return once every stage has exited.
    pub async fn run(&self, paths: Vec<PathBuf>, shutdown: ShutdownSignal) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::new(ExecutionMode::Concurrent, paths.len());
        let capacity = self.buffer_size;

        let (sources, source_handle) = spawn_source(paths, capacity, shutdown.clone());

        let ctx = self.ctx.clone();
        let (loaded, load_handle) =
            spawn_stage(LOAD, sources, capacity, shutdown.clone(), move |path: PathBuf| {
                let ctx = ctx.clone();
                async move {
                    blocking(LOAD, move || ctx.load(path))
                        .await
                        .and_then(|loaded| loaded)
                }
            });

        let ctx = self.ctx.clone();
        let (resized, resize_handle) =
            spawn_stage(RESIZE, loaded, capacity, shutdown.clone(), move |item: WorkItem| {
                let ctx = ctx.clone();
                async move { blocking(RESIZE, move || ctx.resize(item)).await }
            });

        let ctx = self.ctx.clone();
        let (grayed, grayscale_handle) =
            spawn_stage(GRAYSCALE, resized, capacity, shutdown.clone(), move |item: WorkItem| {
                let ctx = ctx.clone();
                async move { blocking(GRAYSCALE, move || ctx.grayscale(item)).await }
            });

        let ctx = self.ctx.clone();
        let (mut outcomes, save_handle) = spawn_terminal_stage(
            SAVE,
            grayed,
            capacity,
            shutdown.clone(),
            move |item: WorkItem| {
                let ctx = ctx.clone();
                async move { blocking(SAVE, move || ctx.save(item)).await }
            },
        );

        while let Some(outcome) = outcomes.recv().await {
            summary.record(&outcome);
        }

        join_stage("source", source_handle).await;
        let load = join_stage(LOAD, load_handle).await;
        join_stage(RESIZE, resize_handle).await;
        join_stage(GRAYSCALE, grayscale_handle).await;
        join_stage(SAVE, save_handle).await;

        summary.loaded = load.forwarded;
        summary.skipped = load.dropped;
        summary.interrupted = shutdown.is_triggered();
        summary.set_elapsed(start.elapsed());
        summary
    }
}

/// Wait for a stage task. Panics inside the stage are re-raised here.
async fn join_stage(stage: &'static str, handle: JoinHandle<StageStats>) -> StageStats {
    match handle.await {
        Ok(stats) => stats,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            tracing::warn!("Stage {} did not finish: {}", stage, e);
            StageStats::new(stage)
        }
    }
}
