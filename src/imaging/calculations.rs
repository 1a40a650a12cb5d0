//! Pure calculation functions for image dimensions and size accounting.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the dimensions an image should be scaled to under a width cap.
///
/// The ratio is taken from the width alone; the height follows it so the
/// aspect ratio is preserved, rounded to the nearest pixel (never below 1).
///
/// # Returns
/// * `Some((width, height))` when the image is wider than `max_width`
/// * `None` when no resize is needed (no cap, or already narrow enough).
///   Images are never upscaled.
///
/// # Examples
/// ```
/// # use asset_squeeze::imaging::calculate_max_width_dimensions;
/// // 2000x1000 capped at 1920 → 1920x960
/// assert_eq!(calculate_max_width_dimensions((2000, 1000), Some(1920)), Some((1920, 960)));
///
/// // Already narrow enough → untouched
/// assert_eq!(calculate_max_width_dimensions((800, 600), Some(1920)), None);
/// ```
pub fn calculate_max_width_dimensions(
    original: (u32, u32),
    max_width: Option<u32>,
) -> Option<(u32, u32)> {
    let (orig_w, orig_h) = original;
    let max_w = max_width?;

    if max_w == 0 || orig_w <= max_w {
        return None;
    }

    let ratio = max_w as f64 / orig_w as f64;
    let h = ((orig_h as f64 * ratio).round() as u32).max(1);
    Some((max_w, h))
}

/// Percentage of bytes saved going from `original` to `optimized`.
///
/// Negative when the output grew. Returns `0.0` for an empty original so
/// summaries over zero successful jobs never divide by zero.
pub fn savings_percent(original: u64, optimized: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - optimized as f64) / original as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // calculate_max_width_dimensions tests
    // =========================================================================

    #[test]
    fn max_width_unset_never_resizes() {
        assert_eq!(calculate_max_width_dimensions((4000, 3000), None), None);
    }

    #[test]
    fn max_width_equal_to_width_does_not_resize() {
        assert_eq!(calculate_max_width_dimensions((1920, 1080), Some(1920)), None);
    }

    #[test]
    fn max_width_narrower_image_not_upscaled() {
        assert_eq!(calculate_max_width_dimensions((300, 400), Some(400)), None);
    }

    #[test]
    fn max_width_landscape_downscale() {
        // 2000x1000 → 1920x960
        assert_eq!(
            calculate_max_width_dimensions((2000, 1000), Some(1920)),
            Some((1920, 960))
        );
    }

    #[test]
    fn max_width_portrait_downscale() {
        // 1200x1600 portrait capped at 400 → 400x533.33 → 533
        assert_eq!(
            calculate_max_width_dimensions((1200, 1600), Some(400)),
            Some((400, 533))
        );
    }

    #[test]
    fn max_width_rounds_height_to_nearest() {
        // 1000x667 at 500 → 333.5 → 334
        assert_eq!(
            calculate_max_width_dimensions((1000, 667), Some(500)),
            Some((500, 334))
        );
    }

    #[test]
    fn max_width_extreme_panorama_keeps_one_pixel() {
        assert_eq!(
            calculate_max_width_dimensions((10_000, 1), Some(100)),
            Some((100, 1))
        );
    }

    #[test]
    fn max_width_zero_is_ignored() {
        assert_eq!(calculate_max_width_dimensions((800, 600), Some(0)), None);
    }

    // =========================================================================
    // savings_percent tests
    // =========================================================================

    #[test]
    fn savings_half() {
        assert_eq!(savings_percent(1000, 500), 50.0);
    }

    #[test]
    fn savings_negative_when_output_grows() {
        assert_eq!(savings_percent(100, 150), -50.0);
    }

    #[test]
    fn savings_zero_original_is_zero() {
        assert_eq!(savings_percent(0, 0), 0.0);
        assert_eq!(savings_percent(0, 42), 0.0);
    }

    proptest! {
        #[test]
        fn downscale_hits_cap_and_preserves_aspect(
            w in 2u32..8000,
            h in 1u32..8000,
            cap in 1u32..8000,
        ) {
            match calculate_max_width_dimensions((w, h), Some(cap)) {
                None => prop_assert!(w <= cap),
                Some((new_w, new_h)) => {
                    prop_assert!(w > cap);
                    prop_assert_eq!(new_w, cap);
                    let exact = h as f64 * cap as f64 / w as f64;
                    prop_assert!((new_h as f64 - exact).abs() <= 1.0);
                    prop_assert!(new_h >= 1);
                }
            }
        }

        #[test]
        fn never_upscales(w in 1u32..8000, h in 1u32..8000, cap in 1u32..8000) {
            if let Some((new_w, new_h)) = calculate_max_width_dimensions((w, h), Some(cap)) {
                prop_assert!(new_w < w);
                prop_assert!(new_h <= h);
            }
        }
    }
}
