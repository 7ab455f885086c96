//! Error types for the graypipe image pipeline.
//!
//! Per-item errors (`PipelineError`) carry the offending path so a single log
//! line is enough to tell which input was skipped and why.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for graypipe operations.
#[derive(Error, Debug)]
pub enum GraypipeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-item pipeline errors, organized by the stage that raises them.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input path does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Input exceeds the configured size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The derived destination would overwrite the source
    #[error("Destination collides with source: {0}")]
    DestinationCollision(PathBuf),

    /// Writing the output image failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// A blocking task was cancelled before it produced a result
    #[error("Task aborted in {stage} stage")]
    TaskAborted { stage: &'static str },
}

/// Convenience type alias for graypipe results.
pub type Result<T> = std::result::Result<T, GraypipeError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
