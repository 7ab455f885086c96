//! Expansion of directory inputs into image file lists.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when walking a directory.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff",
];

/// Finds image files in directories.
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    extensions: Vec<String>,
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new(SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }
}

impl FileDiscovery {
    /// Create a discovery instance accepting the given extensions.
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Expand an input list in order.
    ///
    /// Directories are replaced by the supported files beneath them, sorted by
    /// path. Anything else is passed through untouched, including paths that
    /// do not exist; those are reported when the pipeline tries to load them.
    pub fn expand(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(inputs.len());
        for input in inputs {
            if input.is_dir() {
                paths.extend(self.walk(input));
            } else {
                paths.push(input.clone());
            }
        }
        paths
    }

    /// Recursively find all supported files in a directory.
    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.is_supported(e.path()))
            .map(|e| e.into_path())
            .collect();

        // Sort by path for deterministic ordering
        files.sort();
        files
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
