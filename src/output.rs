//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! 🖼️  Starting Image Optimization
//!
//! ============================================================
//!
//! ✅ salon-interior-1.jpg
//!    Original: 812.4 KB
//!    Optimized: 143.9 KB
//!    Savings: 82.3%
//!
//! ⚠️  Skipping testimonial-linda.jpg (not found)
//! ❌ Error processing client/public/logo.png: decode error: ...
//! ============================================================
//!
//! 📊 OPTIMIZATION SUMMARY
//!
//! Images processed: 1/3
//! Skipped: 1
//! Failed: 1
//! Total original size: 0.79 MB
//! Total optimized size: 0.14 MB
//! Total savings: 82.3%
//! Space saved: 0.65 MB
//! ```
//!
//! ## Check
//!
//! ```text
//! Manifest: optimize.toml (3 jobs)
//! 001 salon-interior-1.jpg → salon-interior-1.webp (q85, ≤1920px)
//! 002 stylora-logo.png → stylora-logo.webp (q90, ≤512px)
//!     missing: client/public/stylora-logo.png
//!
//! 1 of 2 inputs present
//! ```
//!
//! # Architecture
//!
//! Each surface has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::{Accumulator, JobOutcome, JobReport};
use crate::imaging::savings_percent;
use crate::types::{ConversionResult, JobDescriptor};
use std::path::Path;

const RULE_WIDTH: usize = 60;

// ============================================================================
// Shared helpers
// ============================================================================

fn kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `q85, ≤1920px` or just `q85`.
fn job_settings(job: &JobDescriptor) -> String {
    match job.max_width {
        Some(w) => format!("q{}, ≤{}px", job.quality.value(), w),
        None => format!("q{}", job.quality.value()),
    }
}

// ============================================================================
// Run output
// ============================================================================

/// Banner printed before the first job.
pub fn format_run_header() -> Vec<String> {
    vec![
        "🖼️  Starting Image Optimization".to_string(),
        String::new(),
        rule(),
        String::new(),
    ]
}

/// Lines for one finished (or skipped) job.
pub fn format_job_report(report: &JobReport) -> Vec<String> {
    let name = report.job.input_name();
    match &report.outcome {
        JobOutcome::Skipped => vec![format!("⚠️  Skipping {} (not found)", name)],
        JobOutcome::Converted {
            result:
                ConversionResult::Success {
                    original_bytes,
                    optimized_bytes,
                },
        } => vec![
            format!("✅ {}", name),
            format!("   Original: {:.1} KB", kb(*original_bytes)),
            format!("   Optimized: {:.1} KB", kb(*optimized_bytes)),
            format!(
                "   Savings: {:.1}%",
                savings_percent(*original_bytes, *optimized_bytes)
            ),
            String::new(),
        ],
        JobOutcome::Converted {
            result: ConversionResult::Failure { input_path, cause },
        } => vec![format!(
            "❌ Error processing {}: {}",
            input_path.display(),
            cause
        )],
    }
}

/// Final summary block. Safe for runs where nothing succeeded.
pub fn format_summary(totals: &Accumulator) -> Vec<String> {
    let mut lines = vec![
        rule(),
        String::new(),
        "📊 OPTIMIZATION SUMMARY".to_string(),
        String::new(),
        format!(
            "Images processed: {}/{}",
            totals.success_count,
            totals.manifest_count()
        ),
    ];
    if totals.skipped_count > 0 {
        lines.push(format!("Skipped: {}", totals.skipped_count));
    }
    if totals.failed_count() > 0 {
        lines.push(format!("Failed: {}", totals.failed_count()));
    }
    lines.extend([
        format!(
            "Total original size: {:.2} MB",
            mb(totals.total_original_bytes)
        ),
        format!(
            "Total optimized size: {:.2} MB",
            mb(totals.total_optimized_bytes)
        ),
        format!("Total savings: {:.1}%", totals.savings_percent()),
        format!(
            "Space saved: {:.2} MB",
            totals.bytes_saved() as f64 / (1024.0 * 1024.0)
        ),
        String::new(),
    ]);
    if totals.success_count == totals.manifest_count() {
        lines.push("✅ Image optimization complete!".to_string());
    } else {
        lines.push("⚠️  Image optimization finished with issues".to_string());
    }
    lines
}

pub fn print_run_header() {
    for line in format_run_header() {
        println!("{}", line);
    }
}

pub fn print_job_report(report: &JobReport) {
    for line in format_job_report(report) {
        println!("{}", line);
    }
}

pub fn print_summary(totals: &Accumulator) {
    for line in format_summary(totals) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// List every job and whether its input exists.
///
/// `source` is the manifest file, or `None` for the built-in manifest.
/// `present` runs once per job; pass `|p| p.exists()` in production.
pub fn format_check_output(
    jobs: &[JobDescriptor],
    source: Option<&Path>,
    present: impl Fn(&Path) -> bool,
) -> Vec<String> {
    let origin = match source {
        Some(path) => path.display().to_string(),
        None => "built-in".to_string(),
    };
    let mut lines = vec![format!("Manifest: {} ({} jobs)", origin, jobs.len())];

    let mut found = 0;
    for (i, job) in jobs.iter().enumerate() {
        lines.push(format!(
            "{} {} → {} ({})",
            format_index(i + 1),
            job.input_name(),
            file_name(&job.output_path),
            job_settings(job)
        ));
        if present(&job.input_path) {
            found += 1;
        } else {
            lines.push(format!("    missing: {}", job.input_path.display()));
        }
    }

    lines.push(String::new());
    lines.push(format!("{} of {} inputs present", found, jobs.len()));
    lines
}

pub fn print_check_output(jobs: &[JobDescriptor], source: Option<&Path>) {
    for line in format_check_output(jobs, source, |p| p.exists()) {
        println!("{}", line);
    }
}
