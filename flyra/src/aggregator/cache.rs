//! In-memory snapshot cache with TTL freshness gating.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::snapshot::{FlightId, FlightSnapshot};

/// Entry in the snapshot cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The last snapshot produced for this identifier.
    snapshot: Arc<FlightSnapshot>,
    /// When that snapshot was fetched, for TTL arithmetic.
    fetched_at: Instant,
}

/// In-memory cache of the last snapshot per flight identifier.
///
/// An entry within the freshness TTL satisfies a request with no
/// upstream call. A stale entry is not discarded: it remains available
/// as the fallback for transient upstream failures until the next
/// successful fetch replaces it (last-write-wins). There is no
/// background sweep - request volume is low and bounded by the number
/// of distinct flights being watched.
pub struct SnapshotCache {
    entries: Mutex<HashMap<FlightId, CacheEntry>>,
    ttl: Duration,
}

impl SnapshotCache {
    /// Creates a cache with the given freshness TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// The configured freshness TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached snapshot if it is still fresh at `now`.
    pub fn get_fresh(&self, id: &FlightId, now: Instant) -> Option<Arc<FlightSnapshot>> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(id)
            .filter(|entry| now.duration_since(entry.fetched_at) < self.ttl)
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Returns the cached snapshot regardless of age (stale fallback).
    pub fn get_any(&self, id: &FlightId) -> Option<Arc<FlightSnapshot>> {
        let entries = self.entries.lock().unwrap();
        entries.get(id).map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Stores a snapshot, unconditionally replacing any previous entry.
    ///
    /// Replacement is last-write-wins: if two fetches for the same
    /// identifier ever race past the single-flight guard, the
    /// later-completing one reflects more recent telemetry.
    pub fn insert(&self, id: FlightId, snapshot: Arc<FlightSnapshot>, now: Instant) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            id,
            CacheEntry {
                snapshot,
                fetched_at: now,
            },
        );
    }

    /// Number of identifiers currently cached (fresh or stale).
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns true when no snapshots are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::snapshot::FlightStatus;

    fn test_snapshot(id: &FlightId) -> Arc<FlightSnapshot> {
        Arc::new(FlightSnapshot {
            id: id.clone(),
            flight_number: id.to_string(),
            status: FlightStatus::Active,
            status_label: None,
            flight_date: None,
            scheduled_time: None,
            gate: None,
            terminal: None,
            departure_airport: None,
            arrival_airport: None,
            departure_delay_min: None,
            arrival_delay_min: None,
            altitude_ft: Some(35000),
            ground_speed_kts: Some(480),
            position: None,
            heading_deg: None,
            departure_coords: None,
            arrival_coords: None,
            distance_miles: None,
            eta: None,
            fetched_at: Utc::now(),
        })
    }

    fn flight_id(raw: &str) -> FlightId {
        FlightId::new(raw).unwrap()
    }

    #[test]
    fn test_fresh_hit_within_ttl() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        let id = flight_id("UA837");
        let now = Instant::now();

        cache.insert(id.clone(), test_snapshot(&id), now);

        let hit = cache.get_fresh(&id, now + Duration::from_secs(5));
        assert!(hit.is_some());
    }

    #[test]
    fn test_stale_past_ttl() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        let id = flight_id("UA837");
        let now = Instant::now();

        cache.insert(id.clone(), test_snapshot(&id), now);

        assert!(cache.get_fresh(&id, now + Duration::from_secs(10)).is_none());
        assert!(
            cache.get_any(&id).is_some(),
            "stale entry must remain for fallback"
        );
    }

    #[test]
    fn test_miss_for_unknown_identifier() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        assert!(cache.get_fresh(&flight_id("UA837"), Instant::now()).is_none());
        assert!(cache.get_any(&flight_id("UA837")).is_none());
    }

    #[test]
    fn test_insert_replaces_previous_entry() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        let id = flight_id("UA837");
        let now = Instant::now();

        let first = test_snapshot(&id);
        cache.insert(id.clone(), first, now);

        let mut updated = (*test_snapshot(&id)).clone();
        updated.altitude_ft = Some(36000);
        cache.insert(id.clone(), Arc::new(updated), now + Duration::from_secs(1));

        let current = cache.get_any(&id).unwrap();
        assert_eq!(current.altitude_ft, Some(36000));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_identifiers_are_independent() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        let ua = flight_id("UA837");
        let aa = flight_id("AA100");
        let now = Instant::now();

        cache.insert(ua.clone(), test_snapshot(&ua), now);

        assert!(cache.get_fresh(&ua, now).is_some());
        assert!(cache.get_fresh(&aa, now).is_none());
    }

    #[test]
    fn test_empty_cache() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }
}
