//! Image decoding and encoding.
//!
//! The pipeline only depends on the [`ImageCodec`] contract; [`FsCodec`] is
//! the filesystem implementation backed by the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::config::OutputConfig;
use crate::error::{PipelineError, PipelineResult};

/// Reads images from and writes images to paths.
///
/// Implementations must be safe to call from several stages at once.
pub trait ImageCodec: Send + Sync {
    /// Decode the image at `path`.
    fn decode(&self, path: &Path) -> PipelineResult<DynamicImage>;

    /// Encode `image` to `path`.
    fn encode(&self, path: &Path, image: &DynamicImage) -> PipelineResult<()>;
}

/// Filesystem codec. Detects input formats by content; picks the output
/// format from the destination extension, defaulting to JPEG.
#[derive(Debug, Clone)]
pub struct FsCodec {
    output: OutputConfig,
}

impl FsCodec {
    /// Create a new codec with the given output settings.
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    fn encode_error(path: &Path, message: impl ToString) -> PipelineError {
        PipelineError::Encode {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

impl ImageCodec for FsCodec {
    fn decode(&self, path: &Path) -> PipelineResult<DynamicImage> {
        let reader = image::ImageReader::open(path)
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot open file: {}", e),
            })?
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn encode(&self, path: &Path, image: &DynamicImage) -> PipelineResult<()> {
        if self.output.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| Self::encode_error(path, e))?;
            }
        }

        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Jpeg);
        let file = File::create(path).map_err(|e| Self::encode_error(path, e))?;
        let mut writer = BufWriter::new(file);

        match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut writer, self.output.jpeg_quality);
                image
                    .write_with_encoder(encoder)
                    .map_err(|e| Self::encode_error(path, e))?;
            }
            // The GIF encoder only takes RGB(A) buffers
            ImageFormat::Gif => DynamicImage::ImageRgba8(image.to_rgba8())
                .write_to(&mut writer, ImageFormat::Gif)
                .map_err(|e| Self::encode_error(path, e))?,
            other => image
                .write_to(&mut writer, other)
                .map_err(|e| Self::encode_error(path, e))?,
        }

        std::io::Write::flush(&mut writer).map_err(|e| Self::encode_error(path, e))
    }
}
