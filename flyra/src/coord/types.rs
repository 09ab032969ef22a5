//! Coordinate type definitions

use serde::Serialize;

/// Valid latitude range in decimal degrees.
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in decimal degrees.
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A validated geographic position in decimal degrees.
///
/// Construction goes through [`crate::coord::validate`], so a `LatLon`
/// held anywhere in the system is always within range and never NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    /// Latitude in decimal degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180).
    pub longitude: f64,
}

impl LatLon {
    /// Creates a `LatLon` without validation.
    ///
    /// Callers outside this module should prefer [`crate::coord::validate`].
    /// This constructor exists for statically known-good coordinates,
    /// such as the airport table.
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}
