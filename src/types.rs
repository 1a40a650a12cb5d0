//! Shared types passed between the manifest, the transcode engine and the
//! batch runner.
//!
//! These are also serialized into the JSON run report, so field names are
//! part of that format.

use crate::imaging::{OutputFormat, Quality};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One image to optimize.
///
/// Built once from the manifest at startup and never mutated afterwards.
/// Each descriptor is consumed by exactly one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    /// Source image; must exist when the job runs or the job is skipped.
    pub input_path: PathBuf,
    /// Destination file. Its extension selects the output codec.
    pub output_path: PathBuf,
    pub quality: Quality,
    /// Width cap in pixels. `None` keeps the source width.
    pub max_width: Option<u32>,
}

impl JobDescriptor {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        quality: Quality,
        max_width: Option<u32>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            quality,
            max_width,
        }
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        OutputFormat::from_path(&self.output_path)
    }

    /// Display name of the source image (file name only).
    pub fn input_name(&self) -> String {
        file_name(&self.input_path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Why a conversion failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FailureCause {
    /// Input missing, unreadable as an image, or in an unknown format.
    #[error("decode error: {0}")]
    Decode(String),
    /// Encoder failure, unsupported target format, or output not writable.
    #[error("encode error: {0}")]
    Encode(String),
    /// Any other filesystem failure (permissions, stat errors).
    #[error("I/O error: {0}")]
    Io(String),
}

/// Outcome of one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionResult {
    Success {
        /// Size of the input file when the job started.
        original_bytes: u64,
        /// Size of the file written to the output path.
        optimized_bytes: u64,
    },
    Failure {
        input_path: PathBuf,
        cause: FailureCause,
    },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
