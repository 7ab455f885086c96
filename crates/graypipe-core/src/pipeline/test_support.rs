//! Fixtures shared by the pipeline tests.

use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::codec::{FsCodec, ImageCodec};
use super::destination::DirectoryRewrite;
use super::shutdown::ShutdownTrigger;
use super::stages::StageContext;
use super::validate::Validator;
use crate::config::{LimitsConfig, OutputConfig};
use crate::error::{PipelineError, PipelineResult};

/// Stage context rooted at `root`: inputs under `root/in`, outputs under
/// `root/out`.
pub fn context(root: &Path) -> StageContext {
    context_with_codec(root, FsCodec::new(OutputConfig::default()))
}

pub fn context_with_codec(root: &Path, codec: impl ImageCodec + 'static) -> StageContext {
    StageContext {
        codec: Arc::new(codec),
        destination: Arc::new(DirectoryRewrite::new(root.join("in"), root.join("out"))),
        validator: Validator::new(LimitsConfig::default()),
        max_dimension: 500,
    }
}

/// Write a colored gradient image of the given size at `root/relative`.
pub fn write_image(root: &Path, relative: &str, width: u32, height: u32) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(image).save(&path).unwrap();
    path
}

/// Write a file that exists but is not an image.
pub fn write_corrupt(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"this is not an image").unwrap();
    path
}

/// All files under `root/out`, sorted.
pub fn output_files(root: &Path) -> Vec<PathBuf> {
    let out = root.join("out");
    if !out.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(out)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Decodes like [`FsCodec`] but refuses every write.
pub struct FailingEncodeCodec {
    inner: FsCodec,
}

impl FailingEncodeCodec {
    pub fn new() -> Self {
        Self {
            inner: FsCodec::new(OutputConfig::default()),
        }
    }
}

impl ImageCodec for FailingEncodeCodec {
    fn decode(&self, path: &Path) -> PipelineResult<DynamicImage> {
        self.inner.decode(path)
    }

    fn encode(&self, path: &Path, _image: &DynamicImage) -> PipelineResult<()> {
        Err(PipelineError::Encode {
            path: path.to_path_buf(),
            message: "read-only destination".to_string(),
        })
    }
}

/// Writes like [`FsCodec`], then requests shutdown once the file is on disk.
pub struct ShutdownOnEncodeCodec {
    inner: FsCodec,
    trigger: ShutdownTrigger,
}

impl ShutdownOnEncodeCodec {
    pub fn new(trigger: ShutdownTrigger) -> Self {
        Self {
            inner: FsCodec::new(OutputConfig::default()),
            trigger,
        }
    }
}

impl ImageCodec for ShutdownOnEncodeCodec {
    fn decode(&self, path: &Path) -> PipelineResult<DynamicImage> {
        self.inner.decode(path)
    }

    fn encode(&self, path: &Path, image: &DynamicImage) -> PipelineResult<()> {
        let written = self.inner.encode(path, image);
        self.trigger.trigger();
        written
    }
}
