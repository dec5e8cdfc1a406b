//! CLI-specific progress handling for zipdist
//!
//! Provides progress bar implementation for the command-line interface.

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a progress bar for CLI display over a known pair count
pub fn create_progress_bar(total_pairs: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_pairs);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
            .expect("Failed to create progress style")
            .progress_chars("#>-")
    );
    pb
}

/// Progress manager for pipeline runs
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_pairs: u64, message: &str) -> Self {
        let pb = create_progress_bar(total_pairs);

        // Print initial message to stderr
        eprintln!("{message}");

        Self { pb }
    }
}
