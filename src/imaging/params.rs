//! Parameter types for image operations.
//!
//! These structs describe *what* to encode, not *how*. They are the interface
//! between the [`transcode`](crate::transcode) engine (which decides what a job
//! needs) and the [`backend`](super::backend) (which does the actual pixel and
//! codec work).
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (0–100). Clamped on construction.
//! - [`OutputFormat`] — Target codec, chosen from the output file extension.
//! - [`EncodeParams`] — Everything an encoder needs besides the pixels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Quality setting for lossy image encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Lossy target codecs.
///
/// WebP is the default: it is what every asset in the stock manifest targets.
/// AVIF is accepted for jobs whose output path ends in `.avif`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    WebP,
    Avif,
}

impl OutputFormat {
    /// Infer the target codec from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "webp" => Some(Self::WebP),
            "avif" => Some(Self::Avif),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Avif => "avif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebP => write!(f, "WebP"),
            Self::Avif => write!(f, "AVIF"),
        }
    }
}

/// Parameters for a single encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub format: OutputFormat,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 0);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("a/logo.webp")),
            Some(OutputFormat::WebP)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("hero.AVIF")),
            Some(OutputFormat::Avif)
        );
        assert_eq!(OutputFormat::from_path(Path::new("photo.jpg")), None);
        assert_eq!(OutputFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn output_format_extension_roundtrip() {
        for format in [OutputFormat::WebP, OutputFormat::Avif] {
            let path = format!("x.{}", format.extension());
            assert_eq!(OutputFormat::from_path(Path::new(&path)), Some(format));
        }
    }
}
