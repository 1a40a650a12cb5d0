use asset_squeeze::{batch, config, output};
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "asset-squeeze")]
#[command(about = "Batch-optimize web images into small lossy WebP/AVIF files")]
#[command(long_about = "\
Batch-optimize web images into small lossy WebP/AVIF files

Every job in the manifest is decoded, flattened onto white if it has
transparency, scaled down to its max_width if wider, and re-encoded at
maximum compression effort. Missing inputs are skipped, failures are
reported, and the batch always finishes with a summary.

Manifest lookup (first match wins):
  --manifest <path>     explicit file
  ./optimize.toml       in the current directory
  built-in              the stock job list (see 'gen-config')

Output format follows the output file extension: .webp or .avif.

Run 'asset-squeeze gen-config' to print a documented optimize.toml.")]
#[command(version)]
struct Cli {
    /// Manifest file (defaults to ./optimize.toml, then the built-in list)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Override the manifest's base_dir
    #[arg(long, global = true)]
    base_dir: Option<String>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG wins if set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Optimize every image in the manifest (default)
    Run {
        /// Worker threads; overrides processing.max_processes
        #[arg(short, long)]
        jobs: Option<NonZeroUsize>,

        /// Also write a JSON report of every job to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List the manifest's jobs and which inputs exist
    Check,
    /// Print the built-in manifest with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Command::Run {
        jobs: None,
        report: None,
    });

    match command {
        Command::Run { jobs: threads, report } => {
            let loaded = load(cli.manifest.as_deref(), cli.base_dir)?;
            let jobs = loaded.job_descriptors();

            let mut processing = loaded.config.processing.clone();
            if let Some(n) = threads {
                processing.max_processes = Some(n.get());
            }
            let parallel = init_thread_pool(&processing);

            output::print_run_header();
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_job_report(&event);
                }
            });
            let result = batch::run(&jobs, parallel, Some(tx));
            printer.join().map_err(|_| "output thread panicked")?;

            output::print_summary(&result.totals);

            if let Some(path) = report {
                result.save(&path)?;
                println!("Report: {}", path.display());
            }
        }
        Command::Check => {
            let loaded = load(cli.manifest.as_deref(), cli.base_dir)?;
            output::print_check_output(&loaded.job_descriptors(), loaded.source.as_deref());
        }
        Command::GenConfig => {
            print!("{}", config::stock_manifest_toml());
        }
    }

    Ok(())
}

/// Find the manifest relative to the working directory and apply `--base-dir`.
fn load(
    manifest: Option<&Path>,
    base_dir: Option<String>,
) -> Result<config::LoadedManifest, config::ConfigError> {
    let cwd = std::env::current_dir()?;
    let mut loaded = config::locate_manifest(manifest, &cwd)?;
    if let Some(base_dir) = base_dir {
        loaded.config.base_dir = base_dir;
    }
    Ok(loaded)
}

/// Log to stderr so stdout stays the human-readable report.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
/// Returns whether the batch should run in parallel.
fn init_thread_pool(processing: &config::ProcessingConfig) -> bool {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
    threads > 1
}
