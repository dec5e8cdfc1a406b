//! Orchestration loop for zipdist
//!
//! Drives load order -> key pre-fetch -> pair enumeration -> completion
//! filter -> haversine -> batched writes. Resumability comes entirely from
//! the store contents: rerunning skips every committed pair, so an
//! interrupted run loses at most the un-flushed tail of one batch.

use std::sync::Arc;

use log::{debug, info};

use crate::core::error::Result;
use crate::core::geo::haversine_km;
use crate::core::loader::Location;
use crate::core::pairs::{pair_count, PairIndices};
use crate::core::store::{BatchWriter, DistanceRecord, DistanceStore};

/// Records committed per batch by default, matching the store's sweet spot
/// for small transactions
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Progress callback function type, called with (processed, total) pairs
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Options for a pipeline run
pub struct PipelineOptions {
    /// Records committed per batch
    pub batch_size: usize,

    /// Optional progress callback; purely observational
    pub progress: Option<ProgressCallback>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            progress: None,
        }
    }
}

/// Counts describing one completed pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Location records in the input
    pub locations: u64,

    /// Unordered pairs over the input: n * (n - 1) / 2
    pub total_pairs: u64,

    /// Pairs already present in the store and skipped
    pub skipped: u64,

    /// Pairs freshly computed this run
    pub computed: u64,

    /// Rows actually inserted (computed minus duplicate-key no-ops)
    pub inserted: u64,
}

/// Compute and persist the distance for every unordered location pair not
/// already present in the store.
pub fn run(
    locations: &[Location],
    store: &mut DistanceStore,
    options: &PipelineOptions,
) -> Result<RunSummary> {
    let total_pairs = pair_count(locations.len());
    let completed = store.completed_keys()?;
    info!(
        "{} locations, {} pairs total, {} keys already stored",
        locations.len(),
        total_pairs,
        completed.len()
    );

    let mut summary = RunSummary {
        locations: locations.len() as u64,
        total_pairs,
        ..Default::default()
    };

    let mut writer = BatchWriter::new(store, options.batch_size);
    let mut processed = 0u64;

    for (i, j) in PairIndices::new(locations.len()) {
        let a = &locations[i];
        let b = &locations[j];

        // Keys are written in enumeration order, but the filter probes both
        // orderings: a store produced from a differently ordered input must
        // be skipped, not recomputed under a swapped key.
        let done = completed.contains(&(a.zipcode.clone(), b.zipcode.clone()))
            || completed.contains(&(b.zipcode.clone(), a.zipcode.clone()));

        if done {
            summary.skipped += 1;
        } else {
            let distance_km = haversine_km(a.latitude, a.longitude, b.latitude, b.longitude);
            debug!(
                "Distance between {} and {}: {:.2} km",
                a.zipcode, b.zipcode, distance_km
            );
            writer.push(DistanceRecord {
                zip1: a.zipcode.clone(),
                zip2: b.zipcode.clone(),
                distance_km,
            })?;
            summary.computed += 1;
        }

        processed += 1;
        if let Some(progress) = &options.progress {
            progress(processed, total_pairs);
        }
    }

    writer.flush()?;
    summary.inserted = writer.inserted();

    info!(
        "Run complete: {} computed, {} skipped, {} inserted",
        summary.computed, summary.skipped, summary.inserted
    );
    Ok(summary)
}
