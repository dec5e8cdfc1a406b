//! # Zipdist
//!
//! Resumable pairwise great-circle distance computation for postal-code
//! datasets. Given a CSV of (zipcode, latitude, longitude) records, zipdist
//! computes the haversine distance for every distinct unordered pair exactly
//! once and persists the results in a SQLite table keyed on the pair.
//!
//! The store doubles as the checkpoint: rerunning after an interruption
//! skips every pair already committed, so partial progress is never lost
//! and no separate checkpoint file exists.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use zipdist::PipelineOptions;
//!
//! # fn main() -> zipdist::Result<()> {
//! let summary = zipdist::run_file(
//!     Path::new("zipcodes.csv"),
//!     Path::new("zipcode_distances.sqlite"),
//!     &PipelineOptions::default(),
//! )?;
//! println!("{} computed, {} skipped", summary.computed, summary.skipped);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod core;

pub use crate::core::error::{Error, Result};
pub use crate::core::geo::{haversine_km, EARTH_RADIUS_KM};
pub use crate::core::loader::{load_locations, read_locations, Location};
pub use crate::core::pairs::{pair_count, PairIndices};
pub use crate::core::pipeline::{
    run, PipelineOptions, ProgressCallback, RunSummary, DEFAULT_BATCH_SIZE,
};
pub use crate::core::store::{BatchWriter, DistanceRecord, DistanceStore, RESULTS_TABLE};

/// Convenience entry point: load a coordinate CSV, open (or create) the
/// distance store, and compute every missing pair distance.
pub fn run_file(input: &Path, database: &Path, options: &PipelineOptions) -> Result<RunSummary> {
    let locations = load_locations(input)?;
    let mut store = DistanceStore::open(database)?;
    crate::core::pipeline::run(&locations, &mut store, options)
}
