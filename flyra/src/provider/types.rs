//! Provider types and traits.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::snapshot::FlightId;

/// Errors that can occur when fetching from the upstream provider.
///
/// `RateLimited`, `Unavailable`, and `Timeout` are transient: the fetch
/// coordinator may absorb them by serving a stale cached snapshot.
/// `NotFound` and `Malformed` always propagate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Upstream has no record for this flight.
    #[error("flight '{0}' not found in live tracking data")]
    NotFound(String),

    /// Upstream rejected the call due to request-volume limits.
    #[error("upstream rate limit exceeded")]
    RateLimited,

    /// Upstream returned a server error or the transport failed.
    #[error("upstream provider unavailable: {0}")]
    Unavailable(String),

    /// The bounded per-call timeout elapsed.
    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    /// Response body could not be decoded.
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Returns true for failure kinds eligible for stale fallback.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Unavailable(_) | Self::Timeout(_)
        )
    }
}

/// One flight record as shaped by the upstream provider.
///
/// Every field is optional - the payload shape drifts and the provider
/// routinely omits attributes. This record is ephemeral: the normalizer
/// is the single choke point translating "field missing" into
/// "attribute absent", and nothing downstream ever sees a raw record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFlightRecord {
    /// Provider-internal flight identifier.
    pub fr24_id: Option<String>,
    /// Commercial flight number (e.g., "UA837").
    pub flight: Option<String>,
    /// ATC callsign, used as flight number fallback.
    pub callsign: Option<String>,
    /// Free-text status (e.g., "Active", "on time").
    pub status: Option<String>,
    /// Barometric altitude in feet.
    pub alt: Option<f64>,
    /// Ground speed in knots.
    pub gspeed: Option<f64>,
    /// Present position latitude.
    pub lat: Option<f64>,
    /// Present position longitude.
    pub lon: Option<f64>,
    /// Ground track in degrees.
    pub track: Option<f64>,
    /// Departure airport IATA code.
    pub orig_iata: Option<String>,
    /// Departure airport ICAO code.
    pub orig_icao: Option<String>,
    /// Arrival airport IATA code.
    pub dest_iata: Option<String>,
    /// Arrival airport ICAO code.
    pub dest_icao: Option<String>,
    /// Departure airport latitude, when the feed includes it.
    pub orig_lat: Option<f64>,
    /// Departure airport longitude.
    pub orig_lon: Option<f64>,
    /// Arrival airport latitude.
    pub dest_lat: Option<f64>,
    /// Arrival airport longitude.
    pub dest_lon: Option<f64>,
    /// Scheduled date as provider text.
    pub flight_date: Option<String>,
    /// Scheduled time as provider text.
    pub scheduled_time: Option<String>,
    /// Departure gate.
    pub gate: Option<String>,
    /// Departure terminal.
    pub terminal: Option<String>,
    /// Departure delay in minutes.
    pub departure_delay: Option<i32>,
    /// Arrival delay in minutes.
    pub arrival_delay: Option<i32>,
}

/// A departure/arrival route filter for live-flight search.
///
/// At least one endpoint is always present; construction enforces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    departure: Option<String>,
    arrival: Option<String>,
}

impl RouteQuery {
    /// Builds a route query from optional IATA codes.
    ///
    /// Codes are trimmed and uppercased. Returns `None` when neither
    /// endpoint is given (or both are blank).
    pub fn new(departure: Option<&str>, arrival: Option<&str>) -> Option<Self> {
        let clean = |code: Option<&str>| {
            code.map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_uppercase)
        };

        let departure = clean(departure);
        let arrival = clean(arrival);
        if departure.is_none() && arrival.is_none() {
            return None;
        }

        Some(Self { departure, arrival })
    }

    /// Renders the provider's route parameter: "JFK-LAX", "JFK-", or "-LAX".
    pub fn to_route_param(&self) -> String {
        format!(
            "{}-{}",
            self.departure.as_deref().unwrap_or(""),
            self.arrival.as_deref().unwrap_or("")
        )
    }
}

impl std::fmt::Display for RouteQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_route_param())
    }
}

/// Trait for upstream live-flight-data providers.
///
/// Each call performs exactly one outbound request; retry and stale
/// fallback policy belong to the fetch coordinator, which inspects
/// [`ProviderError::is_transient`] to decide what a failure means.
pub trait FlightProvider: Send + Sync {
    /// Fetches the live record for a flight identifier.
    fn fetch_flight(
        &self,
        id: &FlightId,
    ) -> impl Future<Output = Result<RawFlightRecord, ProviderError>> + Send;

    /// Searches live flights matching a departure/arrival route.
    fn search_route(
        &self,
        route: &RouteQuery,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawFlightRecord>, ProviderError>> + Send;
}
