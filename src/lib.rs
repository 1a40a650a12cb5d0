//! # Asset Squeeze
//!
//! Batch optimizer for the images of a static website. A manifest lists
//! source images; each one is turned into a small lossy WebP (or AVIF) file
//! ready to ship.
//!
//! # Pipeline
//!
//! Every job runs the same fixed sequence:
//!
//! ```text
//! decode → flatten alpha onto white → shrink to max_width → encode → measure
//! ```
//!
//! Images narrower than `max_width` are never enlarged. Output always has
//! three opaque channels. Encoding runs at the codec's slowest, smallest
//! setting; the only size/quality knob is the per-job `quality`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `optimize.toml` loading, stock defaults, validation, the built-in job list |
//! | [`types`] | Job descriptors and per-job results shared by every stage |
//! | [`imaging`] | Decode/encode backend, alpha flattening, resize math |
//! | [`transcode`] | The single-job engine: one descriptor in, one result out |
//! | [`batch`] | Runs a job list, skips missing inputs, accumulates totals |
//! | [`output`] | CLI output formatting for per-job lines and the summary |
//!
//! # Design Decisions
//!
//! ## Failures Are Values
//!
//! [`transcode::convert`] never panics and never returns `Err`: a broken input
//! becomes a [`types::ConversionResult::Failure`] and the batch moves on. The
//! only way a run aborts is an unreadable manifest.
//!
//! ## Missing Is Not Failed
//!
//! A job whose input does not exist is skipped before the engine sees it. It
//! still counts toward the "N" of "processed M/N" in the summary, so a
//! manifest with stale entries shows up as incomplete rather than silently
//! shrinking.
//!
//! ## Ordered Output, Optional Parallelism
//!
//! Jobs run one at a time by default. With `max_processes` (or `--jobs`)
//! above one they are converted on a rayon pool, but reports are still
//! emitted and folded in manifest order.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;
pub mod transcode;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
