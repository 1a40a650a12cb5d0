//! Image processing: decode, flatten, resize, encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, TIFF, WebP) |
//! | **Flatten** | per-pixel alpha composite onto white |
//! | **Resize** | `image::imageops::resize` with `Lanczos3` |
//! | **Encode** | libwebp (lossy WebP) or rav1e (AVIF) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and savings math (unit testable)
//! - **Parameters**: Data structures describing an encode
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Pixel transforms between decode and encode

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ColorMode, DecodedImage, ImageBackend};
pub use calculations::{calculate_max_width_dimensions, savings_percent};
pub use operations::{BACKGROUND, composite_onto, fit_to_width, flatten};
pub use params::{EncodeParams, OutputFormat, Quality};
pub use rust_backend::RustBackend;
