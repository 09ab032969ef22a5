//! Raw provider record to canonical snapshot conversion.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::status::FlightStatus;
use super::{FlightId, FlightSnapshot};
use crate::airport;
use crate::coord::{self, LatLon};
use crate::provider::RawFlightRecord;

/// Errors that can occur during normalization.
///
/// Missing optional fields are never an error; only a record whose
/// identity cannot be established fails, surfacing to callers as
/// malformed upstream data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// The raw record has no usable value for a required identity field.
    #[error("raw record is missing identity field '{0}'")]
    MissingIdentity(&'static str),
}

/// Trims a provider string field, mapping blank values to absent.
fn clean(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolves an airport's coordinates: feed-provided values win when
/// valid, otherwise the static table is consulted by IATA code.
fn airport_coords(lat: Option<f64>, lon: Option<f64>, iata: &Option<String>) -> Option<LatLon> {
    lat.zip(lon)
        .and_then(|(lat, lon)| coord::validate(lat, lon))
        .or_else(|| clean(iata).and_then(|code| airport::lookup(&code)))
}

/// Converts a raw provider record into a canonical [`FlightSnapshot`].
///
/// Missing upstream fields map to absent snapshot fields, never to
/// zeroes. Coordinates failing validation become absent without
/// failing the rest of the snapshot. Derived distance and ETA are
/// recomputed on every pass from the telemetry and airport coordinates
/// present in this record.
pub fn normalize(raw: &RawFlightRecord, now: DateTime<Utc>) -> Result<FlightSnapshot, NormalizeError> {
    let flight_number = clean(&raw.flight)
        .or_else(|| clean(&raw.callsign))
        .ok_or(NormalizeError::MissingIdentity("flight"))?;

    let id = clean(&raw.fr24_id)
        .as_deref()
        .or(Some(flight_number.as_str()))
        .and_then(FlightId::new)
        .ok_or(NormalizeError::MissingIdentity("fr24_id"))?;

    let status_label = clean(&raw.status);
    let status = status_label
        .as_deref()
        .map(FlightStatus::parse)
        .unwrap_or_default();

    let position = raw
        .lat
        .zip(raw.lon)
        .and_then(|(lat, lon)| coord::validate(lat, lon));
    let heading_deg = raw.track.and_then(coord::validate_heading);
    let altitude_ft = raw.alt.filter(|a| a.is_finite()).map(|a| a.round() as i32);
    let ground_speed_kts = raw
        .gspeed
        .filter(|s| s.is_finite())
        .map(|s| s.round() as i32);

    let departure_coords = airport_coords(raw.orig_lat, raw.orig_lon, &raw.orig_iata);
    let arrival_coords = airport_coords(raw.dest_lat, raw.dest_lon, &raw.dest_iata);

    let distance_miles = position
        .zip(arrival_coords)
        .map(|(pos, dest)| coord::distance_miles(pos, dest).round() as u32);

    let eta = distance_miles
        .zip(ground_speed_kts.filter(|&kts| kts > 0))
        .map(|(miles, kts)| {
            let hours = f64::from(miles) / coord::knots_to_mph(f64::from(kts));
            now + Duration::seconds((hours * 3600.0).round() as i64)
        });

    Ok(FlightSnapshot {
        id,
        flight_number,
        status,
        status_label,
        flight_date: clean(&raw.flight_date),
        scheduled_time: clean(&raw.scheduled_time),
        gate: clean(&raw.gate),
        terminal: clean(&raw.terminal),
        departure_airport: clean(&raw.orig_iata).or_else(|| clean(&raw.orig_icao)),
        arrival_airport: clean(&raw.dest_iata).or_else(|| clean(&raw.dest_icao)),
        departure_delay_min: raw.departure_delay,
        arrival_delay_min: raw.arrival_delay,
        altitude_ft,
        ground_speed_kts,
        position,
        heading_deg,
        departure_coords,
        arrival_coords,
        distance_miles,
        eta,
        fetched_at: now,
    })
}
