//! Pure image transforms: bounded resize and grayscale conversion.
//!
//! Both take an owned image and return a new one, so they can run on any
//! thread without coordination.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Compute output dimensions so the longer side equals `bound` and the shorter
/// side scales proportionally, truncating toward zero.
///
/// The shorter side never drops below 1. Returns `None` for degenerate inputs
/// (either side 0).
pub fn target_dimensions(width: u32, height: u32, bound: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }

    let scale = |short: u32, long: u32| -> u32 {
        let scaled = u64::from(short) * u64::from(bound) / u64::from(long);
        u32::try_from(scaled).unwrap_or(bound).max(1)
    };

    if width >= height {
        Some((bound, scale(height, width)))
    } else {
        Some((scale(width, height), bound))
    }
}

/// Resize so the longer side equals `bound`, using Lanczos3 resampling.
///
/// Degenerate images are returned unchanged.
pub fn resize(image: DynamicImage, bound: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    match target_dimensions(width, height, bound) {
        Some((w, h)) if (w, h) != (width, height) => {
            image.resize_exact(w, h, FilterType::Lanczos3)
        }
        _ => image,
    }
}

/// Convert to 8-bit luma. Output bounds match the input.
pub fn grayscale(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(gray) => DynamicImage::ImageLuma8(gray),
        other => DynamicImage::ImageLuma8(other.to_luma8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_landscape_exact_division() {
        assert_eq!(target_dimensions(1000, 500, 500), Some((500, 250)));
    }

    #[test]
    fn test_portrait() {
        assert_eq!(target_dimensions(200, 1000, 500), Some((100, 500)));
    }

    #[test]
    fn test_square_upscales() {
        assert_eq!(target_dimensions(100, 100, 500), Some((500, 500)));
    }

    #[test]
    fn test_truncates_toward_zero() {
        // 333 * 500 / 1000 = 166.5
        assert_eq!(target_dimensions(1000, 333, 500), Some((500, 166)));
        assert_eq!(target_dimensions(333, 1000, 500), Some((166, 500)));
    }

    #[test]
    fn test_thin_image_keeps_one_pixel() {
        assert_eq!(target_dimensions(5000, 1, 500), Some((500, 1)));
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(target_dimensions(0, 10, 500), None);
        assert_eq!(target_dimensions(10, 0, 500), None);
    }

    #[test]
    fn test_aspect_ratio_within_one_unit() {
        for (w, h) in [(640, 480), (1920, 1080), (37, 901), (1201, 1199), (3, 7)] {
            let (nw, nh) = target_dimensions(w, h, 500).unwrap();
            assert_eq!(nw.max(nh), 500);
            let exact_short = f64::from(w.min(h)) * 500.0 / f64::from(w.max(h));
            let short = f64::from(nw.min(nh));
            assert!((exact_short - short).abs() < 1.0, "{w}x{h} -> {nw}x{nh}");
        }
    }

    #[test]
    fn test_resize_output_dimensions() {
        let resized = resize(DynamicImage::new_rgb8(1000, 500), 500);
        assert_eq!(resized.dimensions(), (500, 250));

        let resized = resize(DynamicImage::new_rgb8(200, 1000), 500);
        assert_eq!(resized.dimensions(), (100, 500));
    }

    #[test]
    fn test_resize_degenerate_is_identity() {
        let resized = resize(DynamicImage::new_rgb8(0, 0), 500);
        assert_eq!(resized.dimensions(), (0, 0));
    }

    #[test]
    fn test_grayscale_changes_color_pixel() {
        let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 0, 0])));
        let gray = grayscale(red.clone());

        assert_eq!(gray.dimensions(), (10, 10));
        assert_ne!(gray.to_rgb8().get_pixel(0, 0), red.to_rgb8().get_pixel(0, 0));
    }

    #[test]
    fn test_grayscale_idempotent() {
        let img = RgbImage::from_fn(16, 9, |x, y| Rgb([(x * 15) as u8, (y * 28) as u8, 200]));
        let once = grayscale(DynamicImage::ImageRgb8(img));
        let twice = grayscale(once.clone());

        assert_eq!(once.to_luma8().as_raw(), twice.to_luma8().as_raw());
    }
}
