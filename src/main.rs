//! # Zipdist CLI
//!
//! Command-line interface for the zipdist library.
//! Computes and stores pairwise great-circle distances for a postal-code
//! coordinate CSV, resuming from whatever the store already contains.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::error;
use zipdist::{pair_count, DistanceStore, PipelineOptions, Result};

mod cli;

/// Command-line interface for zipdist
#[derive(Parser)]
#[command(name = "zipdist")]
#[command(about = "Resumable pairwise great-circle distance calculator for postal-code datasets")]
#[command(long_about = "Computes the haversine distance for every distinct pair of locations:
  zipdist zipcodes.csv                         # Compute into zipcode_distances.sqlite
  zipdist zipcodes.csv distances.sqlite        # Choose the database file
  zipdist zipcodes.csv --batch-size 500        # Larger commit batches
  zipdist zipcodes.csv --dry-run               # Show remaining work only

Interrupted runs are safe: committed batches persist, and the next run
skips every pair already present in the database.")]
#[command(version)]
struct Cli {
    /// Input CSV with zipcode, latitude and longitude columns
    input: PathBuf,

    /// SQLite database file holding computed distances
    #[arg(default_value = "zipcode_distances.sqlite")]
    database: PathBuf,

    /// Number of records committed per batch
    #[arg(long, default_value_t = zipdist::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Show what would be computed without computing
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("❌ Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🧭 Zipdist v{} starting...", env!("CARGO_PKG_VERSION"));
    }

    let locations = zipdist::load_locations(&cli.input)?;
    let mut store = DistanceStore::open(&cli.database)?;

    let total_pairs = pair_count(locations.len());
    let stored = store.len()?;

    if cli.dry_run {
        eprintln!(
            "🔍 [DRY RUN] {} locations, {total_pairs} pairs, {stored} rows already stored in {}",
            locations.len(),
            cli.database.display()
        );
        return Ok(());
    }

    eprintln!("💾 Storing results in: {}", cli.database.display());

    // Create progress bar manager
    let progress_manager =
        cli::ProgressManager::new(total_pairs, &format!("🧮 Processing {total_pairs} pairs"));

    let options = PipelineOptions {
        batch_size: cli.batch_size,
        progress: Some(Arc::new({
            let pb = progress_manager.pb.clone();
            move |processed, total| {
                if pb.length().unwrap_or(0) != total {
                    pb.set_length(total);
                }
                pb.set_position(processed);
                if processed >= total {
                    pb.finish_with_message("✅ All pairs computed!");
                }
            }
        })),
    };

    let summary = zipdist::run(&locations, &mut store, &options)?;

    println!(
        "Calculation completed: {} computed, {} already complete, {} rows inserted into '{}'",
        summary.computed,
        summary.skipped,
        summary.inserted,
        cli.database.display()
    );

    Ok(())
}
