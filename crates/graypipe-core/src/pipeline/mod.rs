//! Image processing pipeline components.
//!
//! - **codec**: decode from and encode to paths
//! - **transform**: bounded resize and grayscale conversion
//! - **destination**: input path to output path mapping
//! - **validate**: pre-decode input checks
//! - **discovery**: expand directory inputs
//! - **stages**: per-item operations shared by both runners
//! - **channel**: bounded channels and the generic stage
//! - **shutdown**: graceful shutdown signal
//! - **concurrent** / **sequential**: the two runners
//! - **processor**: config-driven entry point

pub mod channel;
pub mod codec;
pub mod concurrent;
pub mod destination;
pub mod discovery;
pub mod processor;
pub mod sequential;
pub mod shutdown;
pub mod stages;
pub mod transform;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient access
pub use channel::{spawn_source, spawn_stage, spawn_terminal_stage, PipelineStage};
pub use codec::{FsCodec, ImageCodec};
pub use concurrent::ConcurrentRunner;
pub use destination::{DestinationRule, DirectoryRewrite};
pub use discovery::FileDiscovery;
pub use processor::ImageProcessor;
pub use sequential::SequentialRunner;
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};
pub use stages::StageContext;
pub use validate::Validator;
