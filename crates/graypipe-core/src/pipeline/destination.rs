//! Mapping from input paths to output paths.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};

/// Derives where a processed image is written.
///
/// Must be a pure function of the source path.
pub trait DestinationRule: Send + Sync {
    fn destination(&self, source: &Path) -> PipelineResult<PathBuf>;
}

impl<F> DestinationRule for F
where
    F: Fn(&Path) -> PipelineResult<PathBuf> + Send + Sync,
{
    fn destination(&self, source: &Path) -> PipelineResult<PathBuf> {
        self(source)
    }
}

/// Replaces a leading input directory with an output directory.
///
/// `images/a/b.jpeg` with `images -> images/output` becomes
/// `images/output/a/b.jpeg`. Sources outside the input directory land directly
/// under the output directory by file name.
#[derive(Debug, Clone)]
pub struct DirectoryRewrite {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl DirectoryRewrite {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    fn outside_input_message(&self, source: &Path) -> String {
        format!(
            "{} is outside {}, writing to {}",
            source.display(),
            self.input_dir.display(),
            self.output_dir.display()
        )
    }
}

impl DestinationRule for DirectoryRewrite {
    fn destination(&self, source: &Path) -> PipelineResult<PathBuf> {
        let destination = match source.strip_prefix(&self.input_dir) {
            Ok(rest) if !rest.as_os_str().is_empty() => self.output_dir.join(rest),
            _ => {
                let file_name = source
                    .file_name()
                    .ok_or_else(|| PipelineError::DestinationCollision(source.to_path_buf()))?;
                tracing::warn!("{}", self.outside_input_message(source));
                self.output_dir.join(file_name)
            }
        };

        if destination == source {
            return Err(PipelineError::DestinationCollision(source.to_path_buf()));
        }
        Ok(destination)
    }
}
