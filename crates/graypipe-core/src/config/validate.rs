//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

/// Largest `limits.max_file_size_mb` whose byte count fits in a `u64`.
pub const MAX_FILE_SIZE_MB: u64 = u64::MAX / (1024 * 1024);

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.buffer_size == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.buffer_size must be > 0".into(),
            ));
        }
        if self.resize.max_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "resize.max_dimension must be > 0".into(),
            ));
        }
        if self.output.jpeg_quality == 0 || self.output.jpeg_quality > 100 {
            return Err(ConfigError::ValidationError(
                "output.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        let max_mb = self.limits.max_file_size_mb;
        if max_mb == 0 || max_mb > MAX_FILE_SIZE_MB {
            return Err(ConfigError::ValidationError(format!(
                "limits.max_file_size_mb must be between 1 and {}",
                MAX_FILE_SIZE_MB
            )));
        }
        if self.paths.input_dir == self.paths.output_dir {
            return Err(ConfigError::ValidationError(
                "paths.output_dir must differ from paths.input_dir".into(),
            ));
        }
        Ok(())
    }
}
