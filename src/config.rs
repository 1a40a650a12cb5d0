//! Optimization manifest.
//!
//! The manifest is the fixed list of images to optimize, written as TOML.
//! It is loaded once at startup, validated, and turned into immutable
//! [`JobDescriptor`]s. Nothing is discovered on disk: an image that is not
//! listed is not touched.
//!
//! ## Manifest File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_dir = "."            # Inputs and outputs are relative to this
//!                           # (itself relative to the manifest file)
//!
//! [defaults]
//! quality = 85              # Lossy quality (0-100) for jobs that omit it
//! # max_width = 1920        # Width cap for jobs that omit it (unset = none)
//!
//! [processing]
//! # max_processes = 4       # Parallel workers (unset = sequential)
//!
//! [[jobs]]
//! input = "hero.jpg"
//! output = "hero.webp"      # Optional; defaults to <input stem>.webp
//! quality = 85              # Optional; falls back to [defaults]
//! max_width = 1920          # Optional; falls back to [defaults]
//! ```
//!
//! The output extension picks the codec: `.webp` or `.avif`.
//!
//! ## Layering
//!
//! Stock defaults are serialized to a TOML table and the user file is merged
//! on top ([`merge_toml`]), so a manifest only has to spell out what differs.
//! Arrays replace rather than merge: a user `jobs` list is the whole list.
//!
//! When no manifest file is present the [built-in manifest](stock_manifest_toml)
//! is used. Unknown keys are rejected to catch typos early.

use crate::imaging::{OutputFormat, Quality};
use crate::types::JobDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when `--manifest` is absent.
pub const DEFAULT_MANIFEST: &str = "optimize.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Manifest validation error: {0}")]
    Validation(String),
}

/// Parsed optimization manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Directory that job paths are relative to.
    pub base_dir: String,
    /// Fallback values for jobs that omit them.
    pub defaults: JobDefaults,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Images to optimize, in run order.
    pub jobs: Vec<JobEntry>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
            defaults: JobDefaults::default(),
            processing: ProcessingConfig::default(),
            jobs: Vec::new(),
        }
    }
}

/// Fallback job settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobDefaults {
    /// Lossy quality (0 = smallest, 100 = most faithful).
    pub quality: u32,
    /// Width cap in pixels; unset means no resize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
            max_width: None,
        }
    }
}

/// One `[[jobs]]` entry as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobEntry {
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
}

impl JobEntry {
    /// Output path as written, or `<input stem>.webp` next to the input.
    pub fn output_or_default(&self) -> String {
        match &self.output {
            Some(out) => out.clone(),
            None => Path::new(&self.input)
                .with_extension(OutputFormat::WebP.extension())
                .to_string_lossy()
                .into_owned(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel conversion workers.
    /// When absent, jobs run one at a time in manifest order.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → 1 (sequential)
/// - `Some(n)` → `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(1)
}

impl ManifestConfig {
    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.quality > 100 {
            return Err(ConfigError::Validation(
                "defaults.quality must be 0-100".into(),
            ));
        }
        if self.defaults.max_width == Some(0) {
            return Err(ConfigError::Validation(
                "defaults.max_width must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be non-zero".into(),
            ));
        }
        for (i, job) in self.jobs.iter().enumerate() {
            let label = format!("jobs[{}]", i);
            if job.input.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{label}.input must not be empty"
                )));
            }
            if job.quality.is_some_and(|q| q > 100) {
                return Err(ConfigError::Validation(format!(
                    "{label}.quality must be 0-100"
                )));
            }
            if job.max_width == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "{label}.max_width must be non-zero"
                )));
            }
            let output = job.output_or_default();
            if OutputFormat::from_path(Path::new(&output)).is_none() {
                return Err(ConfigError::Validation(format!(
                    "{label}.output '{output}' must end in .webp or .avif"
                )));
            }
        }
        Ok(())
    }

    /// Turn manifest entries into job descriptors.
    ///
    /// `root` is the directory the manifest lives in; `base_dir` is resolved
    /// against it unless it is absolute.
    pub fn job_descriptors(&self, root: &Path) -> Vec<JobDescriptor> {
        let base = root.join(&self.base_dir);
        self.jobs
            .iter()
            .map(|job| {
                JobDescriptor::new(
                    base.join(&job.input),
                    base.join(job.output_or_default()),
                    Quality::new(job.quality.unwrap_or(self.defaults.quality)),
                    job.max_width.or(self.defaults.max_width),
                )
            })
            .collect()
    }
}

// =============================================================================
// Manifest loading, merging, and validation
// =============================================================================

/// Returns the stock default manifest as a `toml::Value::Table`.
///
/// This is the base layer that user manifests are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ManifestConfig::default()).expect("default manifest must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ManifestConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ManifestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Parse manifest text on top of the stock defaults.
pub fn parse_manifest(content: &str) -> Result<ManifestConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Load a manifest file. Errors if the file is missing or invalid.
pub fn load_manifest(path: &Path) -> Result<ManifestConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// The built-in manifest: the site's static marketing assets.
pub fn builtin_manifest() -> ManifestConfig {
    parse_manifest(stock_manifest_toml()).expect("built-in manifest must be valid")
}

/// Where the jobs come from and which directory their paths are relative to.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub config: ManifestConfig,
    /// Directory relative paths are resolved against.
    pub root: PathBuf,
    /// The file the manifest was read from; `None` for the built-in manifest.
    pub source: Option<PathBuf>,
}

impl LoadedManifest {
    pub fn job_descriptors(&self) -> Vec<JobDescriptor> {
        self.config.job_descriptors(&self.root)
    }
}

/// Resolve the manifest for a run.
///
/// - explicit path → that file (must exist)
/// - otherwise `optimize.toml` in `cwd` if present
/// - otherwise the built-in manifest, rooted at `cwd`
pub fn locate_manifest(explicit: Option<&Path>, cwd: &Path) -> Result<LoadedManifest, ConfigError> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => Some(cwd.join(DEFAULT_MANIFEST)).filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            let config = load_manifest(&path)?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            Ok(LoadedManifest {
                config,
                root,
                source: Some(path),
            })
        }
        None => Ok(LoadedManifest {
            config: builtin_manifest(),
            root: cwd.to_path_buf(),
            source: None,
        }),
    }
}

/// Returns the fully-commented built-in manifest.
///
/// Used both as the fallback manifest and by the `gen-config` CLI command.
pub fn stock_manifest_toml() -> &'static str {
    r##"# Asset Squeeze Manifest
# ======================
#
# Every image listed here is decoded, flattened onto white if it has
# transparency, scaled down to max_width if wider, and re-encoded.
# Images not listed are never touched. Missing inputs are skipped.

# Job paths are relative to this directory, which is itself relative to
# the manifest file.
base_dir = "client/public"

# ---------------------------------------------------------------------------
# Fallbacks for jobs that omit quality or max_width.
# ---------------------------------------------------------------------------
[defaults]
# Lossy quality, 0-100. Higher is larger and more faithful.
quality = 85
# Width cap in pixels. Leave unset to keep source widths.
# max_width = 1920

# ---------------------------------------------------------------------------
# Parallel processing. Leave unset to convert one image at a time.
# ---------------------------------------------------------------------------
[processing]
# max_processes = 4

# ---------------------------------------------------------------------------
# Jobs, in run order. The output extension picks the codec (.webp / .avif).
# ---------------------------------------------------------------------------

# Salon interior images - high quality, 1920px wide
[[jobs]]
input = "salon-interior-1.jpg"
output = "salon-interior-1.webp"
quality = 85
max_width = 1920

[[jobs]]
input = "salon-interior-2.jpg"
output = "salon-interior-2.webp"
quality = 85
max_width = 1920

# Testimonial portraits - medium quality, 400px wide
[[jobs]]
input = "testimonial-hassan.jpg"
output = "testimonial-hassan.webp"
quality = 80
max_width = 400

[[jobs]]
input = "testimonial-linda.jpg"
output = "testimonial-linda.webp"
quality = 80
max_width = 400

[[jobs]]
input = "testimonial-maria.jpg"
output = "testimonial-maria.webp"
quality = 80
max_width = 400

# Video thumbnail - high quality, 1280px wide
[[jobs]]
input = "video-thumbnail.jpg"
output = "video-thumbnail.webp"
quality = 85
max_width = 1280

# Screenshots - good quality, 1600px wide
[[jobs]]
input = "screenshot-analytics.png"
output = "screenshot-analytics.webp"
quality = 85
max_width = 1600

[[jobs]]
input = "screenshot-booking.png"
output = "screenshot-booking.webp"
quality = 85
max_width = 1600

[[jobs]]
input = "screenshot-calendar.png"
output = "screenshot-calendar.webp"
quality = 85
max_width = 1600

[[jobs]]
input = "screenshot-customers.png"
output = "screenshot-customers.webp"
quality = 85
max_width = 1600

# Logo - high quality, 512px wide
[[jobs]]
input = "stylora-logo.png"
output = "stylora-logo.webp"
quality = 90
max_width = 512
"##
}
