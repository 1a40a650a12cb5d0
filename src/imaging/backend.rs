//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two codec operations the transcode
//! engine needs: decode a file into pixels, and encode opaque RGB pixels into
//! a compressed byte buffer. Pixel work in between (flattening, resizing)
//! lives in [`operations`](super::operations) and never touches a codec.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests swap in a mock
//! that records calls.

use super::params::EncodeParams;
use image::{ColorType, DynamicImage, RgbImage};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Color layout of a freshly decoded image.
///
/// Palette-indexed sources are expanded by the decoders, so an indexed PNG
/// arrives as [`Rgb`](ColorMode::Rgb), or as [`RgbAlpha`](ColorMode::RgbAlpha)
/// when it carries a transparency chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    RgbAlpha,
    Gray,
    GrayAlpha,
}

impl ColorMode {
    pub fn of(color: ColorType) -> Self {
        match (color.has_color(), color.has_alpha()) {
            (true, true) => Self::RgbAlpha,
            (true, false) => Self::Rgb,
            (false, true) => Self::GrayAlpha,
            (false, false) => Self::Gray,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::RgbAlpha | Self::GrayAlpha)
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rgb => "RGB",
            Self::RgbAlpha => "RGBA",
            Self::Gray => "L",
            Self::GrayAlpha => "LA",
        };
        f.write_str(name)
    }
}

/// Pixels decoded from one source file, owned by a single conversion.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: DynamicImage,
    pub mode: ColorMode,
}

impl DecodedImage {
    pub fn new(pixels: DynamicImage) -> Self {
        let mode = ColorMode::of(pixels.color());
        Self { pixels, mode }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Trait for image codec backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Decode the image at `path`.
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError>;

    /// Encode opaque RGB pixels, returning the compressed bytes.
    fn encode(&self, image: &RgbImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError>;
}
