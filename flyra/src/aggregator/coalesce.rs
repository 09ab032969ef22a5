//! Single-flight request coalescing.
//!
//! When several callers ask for the same flight while a fetch is
//! already in flight, only one upstream call runs - every other caller
//! subscribes to the pending result. This is what keeps several UI
//! panels polling one flight from multiplying load on the rate-limited
//! provider.
//!
//! # Implementation
//!
//! A `HashMap<FlightId, broadcast::Sender>` tracks in-flight fetches.
//! When a request arrives:
//! - no in-flight fetch exists: the caller becomes the leader, a
//!   broadcast channel is created, and the caller drives the fetch
//! - a fetch is in flight: the caller subscribes to its channel
//! - when the fetch completes, the result is broadcast to all
//!   subscribers and the identifier is removed from the map

use std::collections::HashMap;

use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use super::{FetchError, FlightReport};
use crate::snapshot::FlightId;

/// Result shared among coalesced waiters.
pub(crate) type FetchResult = Result<FlightReport, FetchError>;

/// Broadcast capacity per in-flight fetch. Each channel carries exactly
/// one message; capacity above 1 only guards against recv lag.
const CHANNEL_CAPACITY: usize = 4;

/// Outcome of registering interest in a flight.
pub(crate) enum Registration {
    /// First request for this flight: the caller must drive the fetch
    /// and call [`RequestCoalescer::complete`]. The receiver observes
    /// the broadcast result like any waiter.
    Leader(broadcast::Receiver<FetchResult>),
    /// A fetch is already in flight: wait on the receiver.
    Waiter(broadcast::Receiver<FetchResult>),
}

impl Registration {
    /// Returns true if this registration must drive the fetch.
    pub(crate) fn is_leader(&self) -> bool {
        matches!(self, Self::Leader(_))
    }

    /// Consumes the registration and waits for the broadcast result.
    pub(crate) async fn wait(self) -> Option<FetchResult> {
        let mut rx = match self {
            Self::Leader(rx) | Self::Waiter(rx) => rx,
        };
        rx.recv().await.ok()
    }
}

/// Statistics for monitoring coalescing effectiveness.
#[derive(Debug, Clone, Default)]
pub struct CoalescerStats {
    /// Total requests received.
    pub total_requests: u64,
    /// Requests that attached to an existing in-flight fetch.
    pub coalesced_requests: u64,
    /// Requests that started a new fetch.
    pub new_requests: u64,
}

impl CoalescerStats {
    /// Share of requests that were coalesced (0.0 to 1.0).
    pub fn coalescing_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.coalesced_requests as f64 / self.total_requests as f64
        }
    }
}

/// Tracks in-flight fetches per flight identifier.
pub(crate) struct RequestCoalescer {
    in_flight: Mutex<HashMap<FlightId, broadcast::Sender<FetchResult>>>,
    stats: Mutex<CoalescerStats>,
}

impl RequestCoalescer {
    pub(crate) fn new() -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
            stats: Mutex::new(CoalescerStats::default()),
        }
    }

    /// Registers interest in a flight, becoming leader or waiter.
    pub(crate) async fn register(&self, id: &FlightId) -> Registration {
        let mut in_flight = self.in_flight.lock().await;
        let mut stats = self.stats.lock().await;

        stats.total_requests += 1;

        if let Some(tx) = in_flight.get(id) {
            stats.coalesced_requests += 1;
            debug!(flight = %id, "coalescing onto in-flight fetch");
            Registration::Waiter(tx.subscribe())
        } else {
            let (tx, rx) = broadcast::channel(CHANNEL_CAPACITY);
            in_flight.insert(id.clone(), tx);
            stats.new_requests += 1;
            debug!(
                flight = %id,
                in_flight = in_flight.len(),
                "starting new fetch"
            );
            Registration::Leader(rx)
        }
    }

    /// Completes a fetch, broadcasting the result to every subscriber
    /// and clearing the in-flight marker.
    pub(crate) async fn complete(&self, id: &FlightId, result: FetchResult) {
        let mut in_flight = self.in_flight.lock().await;

        if let Some(tx) = in_flight.remove(id) {
            let waiters = tx.receiver_count();
            // Send errors mean every receiver already went away
            let _ = tx.send(result);
            if waiters > 1 {
                debug!(flight = %id, waiters = waiters, "broadcast fetch result to coalesced waiters");
            }
        }
    }

    /// Snapshot of the current statistics.
    pub(crate) async fn stats(&self) -> CoalescerStats {
        self.stats.lock().await.clone()
    }

    /// Number of fetches currently in flight.
    pub(crate) async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}
