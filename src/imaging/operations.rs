//! Pixel operations between decode and encode.
//!
//! These functions take ownership of the job's pixels and hand back new ones;
//! nothing here does I/O or talks to a codec.

use super::backend::DecodedImage;
use super::calculations::calculate_max_width_dimensions;
use image::imageops::FilterType;
use image::{Rgb, RgbImage, RgbaImage};

/// Background that transparent pixels are flattened onto.
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Normalize a decoded image to opaque 8-bit RGB.
///
/// Alpha-carrying modes are composited onto [`BACKGROUND`]; modes without
/// alpha are converted channel-for-channel (grayscale is replicated into
/// R, G and B), so no visible value changes.
pub fn flatten(decoded: DecodedImage) -> RgbImage {
    if decoded.mode.has_alpha() {
        composite_onto(&decoded.pixels.to_rgba8(), BACKGROUND)
    } else {
        decoded.pixels.into_rgb8()
    }
}

/// Alpha-composite every pixel over a solid background color.
///
/// `out = (a * src + (255 - a) * bg) / 255`, rounded. Fully opaque pixels
/// come out bit-identical to their source RGB; fully transparent pixels
/// become exactly `bg`.
pub fn composite_onto(src: &RgbaImage, bg: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let a = a as u32;
        let blend = |fg: u8, back: u8| -> u8 {
            ((fg as u32 * a + back as u32 * (255 - a) + 127) / 255) as u8
        };
        Rgb([blend(r, bg[0]), blend(g, bg[1]), blend(b, bg[2])])
    })
}

/// Downscale to `max_width` with Lanczos3 if the image is wider than that.
///
/// Returns the input untouched when no resize is needed.
pub fn fit_to_width(img: RgbImage, max_width: Option<u32>) -> RgbImage {
    match calculate_max_width_dimensions(img.dimensions(), max_width) {
        Some((w, h)) => image::imageops::resize(&img, w, h, FilterType::Lanczos3),
        None => img,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ColorMode;
    use image::{DynamicImage, GrayAlphaImage, GrayImage, LumaA, Rgba};

    #[test]
    fn composite_opaque_pixels_unchanged() {
        let src = RgbaImage::from_pixel(3, 3, Rgba([12, 200, 77, 255]));
        let out = composite_onto(&src, BACKGROUND);
        assert!(out.pixels().all(|p| p.0 == [12, 200, 77]));
    }

    #[test]
    fn composite_transparent_pixels_become_background() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let out = composite_onto(&src, BACKGROUND);
        assert!(out.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn composite_partial_alpha_blends_proportionally() {
        // Black at ~50% over white → mid gray, not black or white
        let src = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let out = composite_onto(&src, BACKGROUND);
        // (255 * 127 + 127) / 255 = 127
        assert_eq!(out.get_pixel(0, 0).0, [127, 127, 127]);

        let src = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 64]));
        let out = composite_onto(&src, BACKGROUND);
        // red: 255; green/blue: (191*255 + 127) / 255 = 191
        assert_eq!(out.get_pixel(0, 0).0, [255, 191, 191]);
    }

    #[test]
    fn composite_onto_non_white_background() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([10, 10, 10, 0]));
        let out = composite_onto(&src, Rgb([1, 2, 3]));
        assert_eq!(out.get_pixel(0, 0).0, [1, 2, 3]);
    }

    #[test]
    fn flatten_rgba_uses_alpha_per_pixel() {
        let mut src = RgbaImage::from_pixel(2, 1, Rgba([40, 50, 60, 255]));
        src.put_pixel(1, 0, Rgba([40, 50, 60, 0]));
        let decoded = DecodedImage::new(DynamicImage::ImageRgba8(src));
        assert_eq!(decoded.mode, ColorMode::RgbAlpha);

        let out = flatten(decoded);
        assert_eq!(out.get_pixel(0, 0).0, [40, 50, 60]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn flatten_gray_alpha() {
        let mut src = GrayAlphaImage::from_pixel(2, 1, LumaA([90, 255]));
        src.put_pixel(1, 0, LumaA([90, 0]));
        let out = flatten(DecodedImage::new(DynamicImage::ImageLumaA8(src)));
        assert_eq!(out.get_pixel(0, 0).0, [90, 90, 90]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn flatten_opaque_rgb_passes_through() {
        let src = RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8 * 10, y as u8 * 20, 7]));
        let out = flatten(DecodedImage::new(DynamicImage::ImageRgb8(src.clone())));
        assert_eq!(out, src);
    }

    #[test]
    fn flatten_gray_replicates_channels() {
        let src = GrayImage::from_pixel(2, 2, image::Luma([33]));
        let out = flatten(DecodedImage::new(DynamicImage::ImageLuma8(src)));
        assert!(out.pixels().all(|p| p.0 == [33, 33, 33]));
    }

    #[test]
    fn fit_to_width_downscales() {
        let img = RgbImage::new(200, 100);
        let out = fit_to_width(img, Some(50));
        assert_eq!(out.dimensions(), (50, 25));
    }

    #[test]
    fn fit_to_width_leaves_narrow_images() {
        let img = RgbImage::new(40, 30);
        let out = fit_to_width(img, Some(50));
        assert_eq!(out.dimensions(), (40, 30));
    }

    #[test]
    fn fit_to_width_without_cap() {
        let img = RgbImage::new(4000, 10);
        let out = fit_to_width(img, None);
        assert_eq!(out.dimensions(), (4000, 10));
    }
}
