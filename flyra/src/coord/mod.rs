//! Coordinate validation and great-circle distance.
//!
//! Pure functions shared by the snapshot normalizer: range/NaN validation
//! for geographic coordinates and headings, haversine distance in statute
//! miles, and unit conversions. No side effects, no error types - an
//! out-of-range coordinate is simply absent.

mod types;

pub use types::{LatLon, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in statute miles, used for haversine distance.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Factor converting knots to statute miles per hour.
const KNOTS_TO_MPH: f64 = 1.15078;

/// Validates a (latitude, longitude) pair.
///
/// Returns `Some(LatLon)` with the pair unchanged when both values are
/// finite and within range, `None` otherwise. Callers substitute absence
/// for `None` - an invalid coordinate is never an error.
#[inline]
pub fn validate(latitude: f64, longitude: f64) -> Option<LatLon> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
        return None;
    }
    if !(MIN_LON..=MAX_LON).contains(&longitude) {
        return None;
    }
    Some(LatLon::new_unchecked(latitude, longitude))
}

/// Validates a heading in degrees.
///
/// Accepts values in [0, 360]; exactly 360 normalizes to 0 so the
/// returned heading is always in [0, 360). Non-finite or out-of-range
/// values yield `None`.
#[inline]
pub fn validate_heading(degrees: f64) -> Option<u16> {
    if !degrees.is_finite() || !(0.0..=360.0).contains(&degrees) {
        return None;
    }
    let rounded = degrees.round() as u16;
    Some(rounded % 360)
}

/// Great-circle distance between two positions in statute miles.
///
/// Uses the haversine formula, which is accurate enough for
/// remaining-distance display over flight-length distances.
pub fn distance_miles(from: LatLon, to: LatLon) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Converts ground speed in knots to statute miles per hour.
#[inline]
pub fn knots_to_mph(knots: f64) -> f64 {
    knots * KNOTS_TO_MPH
}
