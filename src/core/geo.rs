//! Great-circle distance math for zipdist
//!
//! Pure haversine implementation; no spatial indexing, every pair is
//! computed directly.

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two coordinates.
///
/// Deterministic and side-effect free. Out-of-range or NaN inputs are the
/// loader's job to reject; here they produce garbage-in-garbage-out numbers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    // Clamp guards against h drifting above 1.0 from rounding on antipodes.
    let h = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
