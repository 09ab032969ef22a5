//! Static airport coordinate lookup.
//!
//! The live provider feed identifies airports by IATA code but does not
//! always include their coordinates. This table covers the major hubs so
//! the normalizer can derive distance remaining and ETA; an unknown code
//! simply leaves the airport coordinates absent.

use crate::coord::LatLon;

/// An airport with IATA code and location.
#[derive(Debug, Clone)]
pub struct Airport {
    /// IATA code (e.g., "SFO", "JFK").
    pub iata: &'static str,
    /// Location in decimal degrees.
    pub position: LatLon,
}

/// Coordinates of major airports, keyed by IATA code.
const AIRPORTS: &[Airport] = &[
    Airport { iata: "SFO", position: LatLon::new_unchecked(37.6213, -122.3790) },
    Airport { iata: "NRT", position: LatLon::new_unchecked(35.7720, 140.3929) },
    Airport { iata: "JFK", position: LatLon::new_unchecked(40.6413, -73.7781) },
    Airport { iata: "LAX", position: LatLon::new_unchecked(34.0522, -118.2437) },
    Airport { iata: "LHR", position: LatLon::new_unchecked(51.4700, -0.4543) },
    Airport { iata: "CDG", position: LatLon::new_unchecked(49.0097, 2.5479) },
    Airport { iata: "DXB", position: LatLon::new_unchecked(25.2532, 55.3657) },
    Airport { iata: "HKG", position: LatLon::new_unchecked(22.3080, 113.9185) },
    Airport { iata: "SIN", position: LatLon::new_unchecked(1.3644, 103.9915) },
    Airport { iata: "ICN", position: LatLon::new_unchecked(37.4602, 126.4407) },
    Airport { iata: "ORD", position: LatLon::new_unchecked(41.9742, -87.9073) },
    Airport { iata: "ATL", position: LatLon::new_unchecked(33.6407, -84.4277) },
    Airport { iata: "DFW", position: LatLon::new_unchecked(32.8998, -97.0403) },
    Airport { iata: "DEN", position: LatLon::new_unchecked(39.8561, -104.6737) },
    Airport { iata: "SEA", position: LatLon::new_unchecked(47.4502, -122.3088) },
    Airport { iata: "BOS", position: LatLon::new_unchecked(42.3656, -71.0096) },
    Airport { iata: "MIA", position: LatLon::new_unchecked(25.7959, -80.2870) },
    Airport { iata: "IAH", position: LatLon::new_unchecked(29.9902, -95.3368) },
    Airport { iata: "PHX", position: LatLon::new_unchecked(33.4342, -112.0116) },
    Airport { iata: "LAS", position: LatLon::new_unchecked(36.0840, -115.1537) },
];

/// Looks up an airport position by IATA code.
///
/// The code is trimmed and matched case-insensitively. Returns `None`
/// for empty input or codes not in the table.
pub fn lookup(iata: &str) -> Option<LatLon> {
    let code = iata.trim();
    if code.is_empty() {
        return None;
    }

    AIRPORTS
        .iter()
        .find(|a| a.iata.eq_ignore_ascii_case(code))
        .map(|a| a.position)
}
