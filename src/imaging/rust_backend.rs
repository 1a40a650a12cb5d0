//! Production codec backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader`, format sniffed from content |
//! | Encode → WebP (lossy) | `webp::Encoder::encode_advanced`, method 6 |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 1) |
//!
//! Both encoders run at their slowest, best-compressing setting. This is an
//! offline batch tool that encodes each asset once, so ratio wins over speed.
//!
//! Encoders write into memory; the caller decides where the bytes land. A
//! failed encode therefore never leaves a truncated file behind.

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::params::{EncodeParams, OutputFormat};
use image::{ExtendedColorType, ImageEncoder, ImageError, ImageReader, RgbImage};
use std::io::ErrorKind;
use std::path::Path;

/// libwebp `method`: 0 = fastest, 6 = slowest / smallest output.
const WEBP_METHOD: i32 = 6;

/// rav1e speed: 1 = slowest / smallest output, 10 = fastest.
const AVIF_SPEED: u8 = 1;

/// Codec backend built on `image` and libwebp.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a read-side I/O failure.
///
/// A missing file is reported as a decode failure (there is nothing to
/// decode); anything else (permissions, EISDIR, device errors) stays an I/O
/// error.
fn read_error(path: &Path, err: std::io::Error) -> BackendError {
    if err.kind() == ErrorKind::NotFound {
        BackendError::Decode(format!("{} not found", path.display()))
    } else {
        BackendError::Io(err)
    }
}

fn load_image(path: &Path) -> Result<DecodedImage, BackendError> {
    let reader = ImageReader::open(path)
        .map_err(|e| read_error(path, e))?
        .with_guessed_format()
        .map_err(|e| read_error(path, e))?;
    let pixels = reader.decode().map_err(|e| match e {
        ImageError::IoError(io) => read_error(path, io),
        other => BackendError::Decode(format!("Failed to decode {}: {}", path.display(), other)),
    })?;
    Ok(DecodedImage::new(pixels))
}

/// Lossy WebP via libwebp's advanced API so `method` can be set.
fn encode_webp(img: &RgbImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| BackendError::Encode("WebP config init failed".into()))?;
    config.lossless = 0;
    config.quality = quality as f32;
    config.method = WEBP_METHOD;

    let encoder = webp::Encoder::from_rgb(img.as_raw(), img.width(), img.height());
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| BackendError::Encode(format!("WebP encode failed: {:?}", e)))?;
    Ok(memory.to_vec())
}

fn encode_avif(img: &RgbImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    // AVIF quality range is 1..=100
    let quality = quality.clamp(1, 100) as u8;
    let encoder =
        image::codecs::avif::AvifEncoder::new_with_speed_quality(&mut buf, AVIF_SPEED, quality);
    encoder
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BackendError::Encode(format!("AVIF encode failed: {}", e)))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError> {
        load_image(path)
    }

    fn encode(&self, image: &RgbImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
        match params.format {
            OutputFormat::WebP => encode_webp(image, params.quality.value()),
            OutputFormat::Avif => encode_avif(image, params.quality.value()),
        }
    }
}
