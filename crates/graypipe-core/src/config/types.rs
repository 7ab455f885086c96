//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::ExecutionMode;

/// Pipeline settings: execution mode and hand-off queue capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// "concurrent" or "sequential"; anything else runs concurrently
    pub mode: String,

    /// Max items buffered between two pipeline stages
    pub buffer_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: "concurrent".to_string(),
            buffer_size: 1,
        }
    }
}

impl PipelineConfig {
    /// Resolve the configured mode string.
    pub fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::from_str_lenient(&self.mode)
    }
}

/// Resize settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Length of the longest edge after resizing
    pub max_dimension: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { max_dimension: 500 }
    }
}

/// Input list and the directory pair used to derive destinations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Inputs processed when none are given on the command line
    pub inputs: Vec<PathBuf>,

    /// Directory prefix stripped from each input path
    pub input_dir: PathBuf,

    /// Directory the stripped remainder is joined onto
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            input_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("images/output"),
        }
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Create missing destination directories before writing
    pub create_dirs: bool,

    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            create_dirs: true,
            jpeg_quality: 75,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum input file size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
