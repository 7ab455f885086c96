//! Per-item operations shared by the sequential and concurrent runners.
//!
//! Both runners call the same functions in the same order, so they write the
//! same bytes for the same input.

use std::path::PathBuf;
use std::sync::Arc;

use super::codec::ImageCodec;
use super::destination::DestinationRule;
use super::transform;
use super::validate::Validator;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{ItemOutcome, WorkItem};

pub const LOAD: &str = "load";
pub const RESIZE: &str = "resize";
pub const GRAYSCALE: &str = "grayscale";
pub const SAVE: &str = "save";

/// Collaborators needed to process one item. Cheap to clone.
#[derive(Clone)]
pub struct StageContext {
    pub codec: Arc<dyn ImageCodec>,
    pub destination: Arc<dyn DestinationRule>,
    pub validator: Validator,
    pub max_dimension: u32,
}

impl StageContext {
    /// Validate, decode, and derive the destination for one input.
    pub fn load(&self, source: PathBuf) -> PipelineResult<WorkItem> {
        self.validator.validate(&source)?;
        let image = self.codec.decode(&source)?;
        let destination = self.destination.destination(&source)?;
        tracing::info!("Loading image: {}", source.display());
        Ok(WorkItem::new(source, destination, image))
    }

    /// Resize the item's image to the configured bound.
    pub fn resize(&self, item: WorkItem) -> WorkItem {
        let bound = self.max_dimension;
        item.map_image(|image| transform::resize(image, bound))
    }

    /// Replace the item's image with its grayscale version.
    pub fn grayscale(&self, item: WorkItem) -> WorkItem {
        item.map_image(transform::grayscale)
    }

    /// Write the item and report the outcome. Consumes the item.
    pub fn save(&self, item: WorkItem) -> ItemOutcome {
        let result = self.codec.encode(item.destination(), item.image());
        match &result {
            Ok(()) => tracing::info!("Saving image: {}", item.destination().display()),
            Err(e) => tracing::error!("Failed to save image: {}", e),
        }
        ItemOutcome {
            source: item.source().to_path_buf(),
            destination: item.destination().to_path_buf(),
            result,
        }
    }
}

/// Run blocking or CPU-bound work off the async worker threads.
///
/// A panic inside `f` is resumed on the caller: transforms are total over
/// decoded images, so a panic is a bug and should take the run down.
pub async fn blocking<T, F>(stage: &'static str, f: F) -> PipelineResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(value) => Ok(value),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(_) => Err(PipelineError::TaskAborted { stage }),
    }
}
