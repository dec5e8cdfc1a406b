//! Core library modules for zipdist
//!
//! This module contains the internal implementation details of the zipdist
//! library.

pub mod error;
pub mod geo;
pub mod loader;
pub mod pairs;
pub mod pipeline;
pub mod store;

// Re-export main types for internal use
pub use loader::Location;
pub use pipeline::{PipelineOptions, RunSummary};
pub use store::DistanceStore;
