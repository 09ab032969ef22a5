//! Canonical flight snapshot entity and normalization.
//!
//! A [`FlightSnapshot`] is the immutable, point-in-time record of a
//! flight's schedule and live state that the rest of the system (and
//! the app's HTTP layer) consumes. The [`normalize`] function is the
//! single choke point between the provider-shaped raw payload and this
//! canonical form.

mod normalizer;
mod status;

pub use normalizer::{normalize, NormalizeError};
pub use status::FlightStatus;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coord::LatLon;

/// Normalized flight identifier used as the cache key.
///
/// Uppercased and whitespace-trimmed at construction; immutable after.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FlightId(String);

impl FlightId {
    /// Builds a normalized identifier, rejecting empty input.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return None;
        }
        Some(Self(normalized))
    }

    /// The normalized identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FlightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical, immutable point-in-time record of a flight.
///
/// Every attribute the provider may omit is an `Option`; absence is
/// never encoded as a zero or sentinel value. A new fetch produces a
/// new snapshot, never a mutation of an old one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSnapshot {
    /// Normalized identifier (also the cache key).
    pub id: FlightId,
    /// Commercial flight number or callsign.
    pub flight_number: String,
    /// Status mapped onto the closed enumeration.
    pub status: FlightStatus,
    /// Original provider status text, kept for display.
    pub status_label: Option<String>,

    /// Scheduled date as provider text.
    pub flight_date: Option<String>,
    /// Scheduled time as provider text.
    pub scheduled_time: Option<String>,
    /// Departure gate.
    pub gate: Option<String>,
    /// Departure terminal.
    pub terminal: Option<String>,

    /// Departure airport code.
    pub departure_airport: Option<String>,
    /// Arrival airport code.
    pub arrival_airport: Option<String>,
    /// Departure delay in minutes.
    pub departure_delay_min: Option<i32>,
    /// Arrival delay in minutes.
    pub arrival_delay_min: Option<i32>,

    /// Barometric altitude in feet.
    pub altitude_ft: Option<i32>,
    /// Ground speed in knots.
    pub ground_speed_kts: Option<i32>,
    /// Present position, validated.
    pub position: Option<LatLon>,
    /// Heading in degrees, [0, 360).
    pub heading_deg: Option<u16>,

    /// Departure airport coordinates, validated.
    pub departure_coords: Option<LatLon>,
    /// Arrival airport coordinates, validated.
    pub arrival_coords: Option<LatLon>,

    /// Great-circle distance remaining to the arrival airport, in miles.
    pub distance_miles: Option<u32>,
    /// Estimated arrival time, derived from distance and ground speed.
    pub eta: Option<DateTime<Utc>>,

    /// When this snapshot was produced.
    pub fetched_at: DateTime<Utc>,
}

impl FlightSnapshot {
    /// Ground speed converted to statute miles per hour.
    pub fn ground_speed_mph(&self) -> Option<i32> {
        self.ground_speed_kts
            .map(|kts| crate::coord::knots_to_mph(f64::from(kts)).round() as i32)
    }
}
