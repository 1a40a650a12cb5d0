//! Shared test utilities: synthetic source images written to disk.
//!
//! Every fixture is generated at test time into a [`TempDir`], so tests never
//! depend on checked-in binaries and can mutate their copies freely.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let src = write_photo_png(tmp.path(), "hero.png", 300, 200);
//! let job = webp_job(&src, tmp.path().join("hero.webp"), 85, Some(150));
//! ```

use crate::imaging::Quality;
use crate::types::JobDescriptor;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

pub use tempfile::TempDir;

/// Smooth, photo-like RGB content: gradients plus low-frequency waves.
pub fn photo_pixels(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let fx = x as f32 / width as f32;
        let fy = y as f32 / height as f32;
        let wave = ((fx * 12.0).sin() * (fy * 9.0).cos() * 40.0) as i32;
        Rgb([
            (fx * 200.0) as i32 + wave,
            (fy * 180.0) as i32 + 30 - wave,
            ((fx + fy) * 90.0) as i32 + 20,
        ]
        .map(|c| c.clamp(0, 255) as u8))
    })
}

/// Write an opaque RGB PNG and return its path.
pub fn write_photo_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    photo_pixels(width, height).save(&path).unwrap();
    path
}

/// Write an RGBA PNG: fully transparent border of `border` px around an
/// opaque `center` color.
pub fn write_bordered_rgba_png(
    dir: &Path,
    name: &str,
    size: u32,
    border: u32,
    center: [u8; 3],
) -> PathBuf {
    let path = dir.join(name);
    let img = RgbaImage::from_fn(size, size, |x, y| {
        let inside = x >= border && y >= border && x < size - border && y < size - border;
        if inside {
            Rgba([center[0], center[1], center[2], 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    img.save(&path).unwrap();
    path
}

/// Build a job whose output is whatever path the caller names.
pub fn webp_job(
    input: &Path,
    output: impl Into<PathBuf>,
    quality: u32,
    max_width: Option<u32>,
) -> JobDescriptor {
    JobDescriptor::new(input, output, Quality::new(quality), max_width)
}

/// Decode an output file back into pixels for assertions.
pub fn read_back(path: &Path) -> image::DynamicImage {
    image::open(path).unwrap_or_else(|e| panic!("cannot reopen {}: {e}", path.display()))
}
