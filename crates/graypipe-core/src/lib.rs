//! graypipe core - batch resize-and-grayscale pipeline.
//!
//! Each input image is decoded, resized so its longest side matches a bound,
//! converted to grayscale, and written next to a rewritten output path.
//!
//! # Architecture
//!
//! Two runners share the same per-item operations:
//!
//! ```text
//! concurrent:  paths → [load] → [resize] → [grayscale] → [save] → outcomes
//! sequential:  for path in paths { load; resize; grayscale; save }
//! ```
//!
//! In the concurrent runner every stage is a separate task connected to its
//! neighbours by bounded channels, so stages overlap in time while memory
//! stays bounded to roughly one item per boundary.
//!
//! # Usage
//!
//! ```rust,ignore
//! use graypipe_core::{Config, ImageProcessor, ShutdownSignal};
//!
//! #[tokio::main]
//! async fn main() -> graypipe_core::Result<()> {
//!     let config = Config::load()?;
//!     let processor = ImageProcessor::new(&config);
//!
//!     let summary = processor
//!         .run(vec!["images/a.jpeg".into()], ShutdownSignal::never())
//!         .await?;
//!     println!("{} saved, {} skipped", summary.saved, summary.skipped);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, GraypipeError, PipelineError, PipelineResult, Result};
pub use pipeline::{
    shutdown_channel, DestinationRule, DirectoryRewrite, FsCodec, ImageCodec, ImageProcessor,
    ShutdownSignal, ShutdownTrigger,
};
pub use types::{ExecutionMode, ItemOutcome, RunSummary, StageStats, WorkItem};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
