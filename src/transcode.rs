//! The transcode engine: one job in, one [`ConversionResult`] out.
//!
//! ```text
//! stat input → decode → flatten onto white → fit to max_width → encode → write → stat output
//! ```
//!
//! Every step that can fail returns a [`FailureCause`]; the first failure
//! short-circuits the rest and is folded into [`ConversionResult::Failure`].
//! Nothing escapes as an error or a panic, so the batch loop only ever sees
//! values.
//!
//! All state (decoded pixels, encoded bytes, file handles) lives on this
//! function's stack and is dropped before it returns, on every path.
//! Two jobs against the same input decode it twice; there is no shared cache.

use crate::imaging::{
    BackendError, EncodeParams, ImageBackend, RustBackend, fit_to_width, flatten,
};
use crate::types::{ConversionResult, FailureCause, JobDescriptor};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

impl From<BackendError> for FailureCause {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Decode(msg) => FailureCause::Decode(msg),
            BackendError::Encode(msg) => FailureCause::Encode(msg),
            BackendError::Io(e) => FailureCause::Io(e.to_string()),
        }
    }
}

/// Convert one job with the production backend.
pub fn convert(job: &JobDescriptor) -> ConversionResult {
    convert_with_backend(&RustBackend::new(), job)
}

/// Convert one job using a specific backend (allows testing with mock).
pub fn convert_with_backend(backend: &impl ImageBackend, job: &JobDescriptor) -> ConversionResult {
    let _span = tracing::info_span!("convert", input = %job.input_path.display()).entered();

    match run_pipeline(backend, job) {
        Ok(result) => result,
        Err(cause) => {
            warn!(%cause, "conversion failed");
            ConversionResult::Failure {
                input_path: job.input_path.clone(),
                cause,
            }
        }
    }
}

fn run_pipeline(
    backend: &impl ImageBackend,
    job: &JobDescriptor,
) -> Result<ConversionResult, FailureCause> {
    let original_bytes = input_len(&job.input_path)?;

    let format = job.output_format().ok_or_else(|| {
        FailureCause::Encode(format!(
            "Unsupported output format: {}",
            job.output_path.display()
        ))
    })?;

    let decoded = backend.decode(&job.input_path)?;
    debug!(
        mode = %decoded.mode,
        width = decoded.width(),
        height = decoded.height(),
        "decoded"
    );

    let rgb = fit_to_width(flatten(decoded), job.max_width);
    debug!(width = rgb.width(), height = rgb.height(), "normalized");

    let bytes = backend.encode(
        &rgb,
        &EncodeParams {
            format,
            quality: job.quality,
        },
    )?;

    std::fs::write(&job.output_path, &bytes).map_err(|e| {
        FailureCause::Encode(format!(
            "Failed to write {}: {}",
            job.output_path.display(),
            e
        ))
    })?;

    let optimized_bytes = std::fs::metadata(&job.output_path)
        .map_err(|e| {
            FailureCause::Io(format!(
                "Failed to stat {}: {}",
                job.output_path.display(),
                e
            ))
        })?
        .len();
    debug!(original_bytes, optimized_bytes, %format, "encoded");

    Ok(ConversionResult::Success {
        original_bytes,
        optimized_bytes,
    })
}

/// Size of the input at job start. A vanished input is a decode failure,
/// matching how the backend reports it.
fn input_len(path: &Path) -> Result<u64, FailureCause> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(FailureCause::Decode(format!(
            "{} not found",
            path.display()
        ))),
        Err(e) => Err(FailureCause::Io(format!(
            "Failed to stat {}: {}",
            path.display(),
            e
        ))),
    }
}
