//! Coordinate loading for zipdist
//!
//! Reads the prepared `zipcodes.csv` shape (header row with `zipcode`,
//! `latitude`, `longitude`) into memory, preserving source order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::core::error::{Error, Result};

/// A single postal-code location record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub zipcode: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Load location records from a CSV file, in source order.
///
/// Any row that fails to parse or carries out-of-range coordinates aborts
/// the load; there is no partial recovery.
pub fn load_locations(path: &Path) -> Result<Vec<Location>> {
    let file = File::open(path)?;
    let locations = read_locations(file)?;
    info!("Loaded {} locations from {}", locations.len(), path.display());
    Ok(locations)
}

/// Load location records from any CSV reader, in source order.
pub fn read_locations<R: Read>(reader: R) -> Result<Vec<Location>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut locations = Vec::new();

    for (index, result) in csv_reader.deserialize::<Location>().enumerate() {
        let location = result.map_err(|e| {
            Error::MalformedRecord(format!("record {}: {e}", index + 1))
        })?;
        validate(index + 1, &location)?;
        locations.push(location);
    }

    Ok(locations)
}

/// Reject coordinates outside the valid latitude/longitude envelope, plus
/// the NaN values an empty CSV field deserializes into.
fn validate(record: usize, location: &Location) -> Result<()> {
    if !location.latitude.is_finite() || !(-90.0..=90.0).contains(&location.latitude) {
        return Err(Error::MalformedRecord(format!(
            "record {record} ({}): latitude {} out of range [-90, 90]",
            location.zipcode, location.latitude
        )));
    }
    if !location.longitude.is_finite() || !(-180.0..=180.0).contains(&location.longitude) {
        return Err(Error::MalformedRecord(format!(
            "record {record} ({}): longitude {} out of range [-180, 180]",
            location.zipcode, location.longitude
        )));
    }
    Ok(())
}
