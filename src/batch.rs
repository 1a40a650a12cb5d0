//! Batch runner: drives the transcode engine over every job in a manifest.
//!
//! For each job, in manifest order:
//!
//! 1. If the input file does not exist, the job is **skipped**. The engine is
//!    never invoked and the job does not count as attempted.
//! 2. Otherwise the engine converts it, and the [`ConversionResult`] is folded
//!    into the [`Accumulator`].
//!
//! One job's failure never stops the batch. The run always produces a
//! [`BatchReport`], even when every job was skipped or failed.
//!
//! ## Parallel Processing
//!
//! With `parallel` set, conversions run on the global
//! [rayon](https://docs.rs/rayon) pool. Results are collected in manifest
//! order and folded on the calling thread afterwards, so totals and event
//! order are identical to a sequential run.

use crate::imaging::{ImageBackend, RustBackend, savings_percent};
use crate::transcode::convert_with_backend;
use crate::types::{ConversionResult, JobDescriptor};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Running totals for a batch.
///
/// Byte totals cover successful jobs only: a failed job has no output to
/// compare against, so counting its input would inflate the savings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Accumulator {
    pub total_original_bytes: u64,
    pub total_optimized_bytes: u64,
    pub success_count: usize,
    /// Jobs handed to the engine (successes + failures). Excludes skips.
    pub job_count: usize,
    pub skipped_count: usize,
}

impl Accumulator {
    /// Fold one engine outcome into the totals.
    pub fn fold(&mut self, result: &ConversionResult) {
        self.job_count += 1;
        // A failed job's input was read but counts toward neither byte
        // total; savings only compare inputs against files actually written.
        if let ConversionResult::Success {
            original_bytes,
            optimized_bytes,
        } = *result
        {
            self.success_count += 1;
            self.total_original_bytes += original_bytes;
            self.total_optimized_bytes += optimized_bytes;
        }
    }

    pub fn record_skip(&mut self) {
        self.skipped_count += 1;
    }

    pub fn failed_count(&self) -> usize {
        self.job_count - self.success_count
    }

    /// Every job in the manifest: attempted plus skipped.
    pub fn manifest_count(&self) -> usize {
        self.job_count + self.skipped_count
    }

    /// Aggregate savings over successful jobs; `0.0` when nothing succeeded.
    pub fn savings_percent(&self) -> f64 {
        savings_percent(self.total_original_bytes, self.total_optimized_bytes)
    }

    /// Bytes saved overall. Negative if outputs grew.
    pub fn bytes_saved(&self) -> i64 {
        self.total_original_bytes as i64 - self.total_optimized_bytes as i64
    }
}

/// What happened to one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome {
    /// Input did not exist; the engine was not invoked.
    Skipped,
    Converted { result: ConversionResult },
}

/// One job's entry in the run report, also sent as a progress event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// 1-based position in the manifest.
    pub position: usize,
    pub job: JobDescriptor,
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

/// Result of a whole batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub jobs: Vec<JobReport>,
    pub totals: Accumulator,
}

impl BatchReport {
    /// Write the report as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), BatchError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Run every job with the production backend.
pub fn run(
    jobs: &[JobDescriptor],
    parallel: bool,
    events: Option<Sender<JobReport>>,
) -> BatchReport {
    run_with_backend(&RustBackend::new(), jobs, parallel, events)
}

/// Run every job using a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    jobs: &[JobDescriptor],
    parallel: bool,
    events: Option<Sender<JobReport>>,
) -> BatchReport {
    let mut totals = Accumulator::default();
    let mut reports = Vec::with_capacity(jobs.len());

    let mut record = |position: usize, job: &JobDescriptor, outcome: JobOutcome| {
        match &outcome {
            JobOutcome::Skipped => totals.record_skip(),
            JobOutcome::Converted { result } => totals.fold(result),
        }
        let report = JobReport {
            position,
            job: job.clone(),
            outcome,
        };
        if let Some(tx) = &events {
            // A closed receiver only means nobody is listening.
            tx.send(report.clone()).ok();
        }
        reports.push(report);
    };

    if parallel {
        let outcomes: Vec<JobOutcome> = jobs.par_iter().map(|job| attempt(backend, job)).collect();
        for (i, (job, outcome)) in jobs.iter().zip(outcomes).enumerate() {
            record(i + 1, job, outcome);
        }
    } else {
        for (i, job) in jobs.iter().enumerate() {
            let outcome = attempt(backend, job);
            record(i + 1, job, outcome);
        }
    }

    info!(
        succeeded = totals.success_count,
        failed = totals.failed_count(),
        skipped = totals.skipped_count,
        "batch complete"
    );

    BatchReport {
        jobs: reports,
        totals,
    }
}

fn attempt(backend: &impl ImageBackend, job: &JobDescriptor) -> JobOutcome {
    if !job.input_path.exists() {
        warn!(input = %job.input_path.display(), "input not found, skipping");
        return JobOutcome::Skipped;
    }
    JobOutcome::Converted {
        result: convert_with_backend(backend, job),
    }
}
