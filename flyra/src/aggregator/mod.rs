//! Flight state aggregation.
//!
//! The [`FetchCoordinator`] sits between callers and the upstream
//! provider. It serves fresh cache hits without touching the network,
//! coalesces concurrent requests for the same flight into a single
//! upstream call, and falls back to stale cached state when the
//! provider has a transient failure.

mod cache;
mod coalesce;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::provider::{FlightProvider, ProviderError};
use crate::snapshot::{normalize, FlightId, FlightSnapshot, NormalizeError};
use crate::time::{Clock, SystemClock};

pub use cache::SnapshotCache;
pub use coalesce::CoalescerStats;

use coalesce::{FetchResult, RequestCoalescer};

/// How the snapshot in a [`FlightReport`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched from the provider during this request.
    Fresh,
    /// Served from cache within the freshness window.
    Cached,
    /// Served from an expired cache entry because the provider failed.
    Stale,
}

impl Freshness {
    /// Returns true when the snapshot outlived its freshness window.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// A snapshot together with how it was obtained.
#[derive(Debug, Clone)]
pub struct FlightReport {
    pub snapshot: Arc<FlightSnapshot>,
    pub freshness: Freshness,
}

/// Error fetching or normalizing a flight.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Coordinates flight fetches across a cache, a request coalescer, and
/// the upstream provider.
///
/// Request flow for [`FetchCoordinator::fetch`]:
/// 1. a cache entry younger than the TTL is returned immediately
/// 2. otherwise the request registers with the coalescer; if a fetch
///    for the same flight is already in flight, the caller waits for
///    its result instead of starting another
/// 3. the leading request runs the fetch on a detached task, so a
///    caller that disconnects mid-fetch never aborts the fetch the
///    other waiters are sharing
pub struct FetchCoordinator<P> {
    provider: Arc<P>,
    cache: Arc<SnapshotCache>,
    coalescer: Arc<RequestCoalescer>,
    clock: Arc<dyn Clock>,
}

impl<P> Clone for FetchCoordinator<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            cache: Arc::clone(&self.cache),
            coalescer: Arc::clone(&self.coalescer),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<P: FlightProvider + 'static> FetchCoordinator<P> {
    /// Creates a coordinator with the given freshness window.
    pub fn new(provider: Arc<P>, ttl: Duration) -> Self {
        Self::with_clock(provider, ttl, Arc::new(SystemClock))
    }

    /// Creates a coordinator with an injected clock.
    pub fn with_clock(provider: Arc<P>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            cache: Arc::new(SnapshotCache::new(ttl)),
            coalescer: Arc::new(RequestCoalescer::new()),
            clock,
        }
    }

    /// Returns the current flight state, fetching from the provider
    /// only when the cache has no fresh entry.
    pub async fn fetch(&self, id: &FlightId) -> Result<FlightReport, FetchError> {
        if let Some(snapshot) = self.cache.get_fresh(id, self.clock.now()) {
            debug!(flight = %id, "serving cached snapshot");
            return Ok(FlightReport {
                snapshot,
                freshness: Freshness::Cached,
            });
        }

        let registration = self.coalescer.register(id).await;

        if registration.is_leader() {
            // The fetch runs detached so that a caller dropping this
            // future cannot abort the fetch other waiters depend on.
            let coordinator = self.clone();
            let id = id.clone();
            tokio::spawn(async move {
                let result = coordinator.run_fetch(&id).await;
                coordinator.coalescer.complete(&id, result).await;
            });
        }

        registration.wait().await.unwrap_or_else(|| {
            Err(FetchError::Provider(ProviderError::Unavailable(
                "fetch task dropped before completing".to_string(),
            )))
        })
    }

    async fn run_fetch(&self, id: &FlightId) -> FetchResult {
        match self.provider.fetch_flight(id).await {
            Ok(raw) => {
                let snapshot = Arc::new(normalize(&raw, self.clock.now_utc())?);
                self.cache
                    .insert(id.clone(), Arc::clone(&snapshot), self.clock.now());
                Ok(FlightReport {
                    snapshot,
                    freshness: Freshness::Fresh,
                })
            }
            Err(err) if err.is_transient() => match self.cache.get_any(id) {
                Some(snapshot) => {
                    warn!(flight = %id, error = %err, "provider failed, serving stale snapshot");
                    Ok(FlightReport {
                        snapshot,
                        freshness: Freshness::Stale,
                    })
                }
                None => Err(FetchError::Provider(err)),
            },
            Err(err) => Err(FetchError::Provider(err)),
        }
    }

    /// Coalescing statistics since startup.
    pub async fn stats(&self) -> CoalescerStats {
        self.coalescer.stats().await
    }

    /// Number of cached snapshots, fresh or stale.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::provider::{RawFlightRecord, RouteQuery};
    use crate::time::ManualClock;

    /// Provider returning a scripted sequence of responses.
    struct ScriptedProvider {
        responses: Mutex<Vec<Result<RawFlightRecord, ProviderError>>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<RawFlightRecord, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FlightProvider for ScriptedProvider {
        async fn fetch_flight(&self, _id: &FlightId) -> Result<RawFlightRecord, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Err(ProviderError::Unavailable("script exhausted".to_string()))
            } else {
                responses.remove(0)
            }
        }

        async fn search_route(
            &self,
            _route: &RouteQuery,
            _limit: usize,
        ) -> Result<Vec<RawFlightRecord>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn airborne_record() -> RawFlightRecord {
        RawFlightRecord {
            fr24_id: Some("39c4c841".to_string()),
            flight: Some("UA837".to_string()),
            status: Some("active".to_string()),
            alt: Some(37000.0),
            gspeed: Some(520.0),
            lat: Some(41.2),
            lon: Some(-160.5),
            track: Some(290.0),
            orig_iata: Some("SFO".to_string()),
            dest_iata: Some("NRT".to_string()),
            ..Default::default()
        }
    }

    fn flight_id(raw: &str) -> FlightId {
        FlightId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_fresh_report() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(airborne_record())]));
        let coordinator = FetchCoordinator::new(Arc::clone(&provider), Duration::from_secs(10));

        let report = coordinator.fetch(&flight_id("UA837")).await.unwrap();

        assert_eq!(report.freshness, Freshness::Fresh);
        assert_eq!(report.snapshot.flight_number, "UA837");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_hits_cache() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(airborne_record()),
            Ok(airborne_record()),
        ]));
        let coordinator = FetchCoordinator::new(Arc::clone(&provider), Duration::from_secs(10));
        let id = flight_id("UA837");

        let first = coordinator.fetch(&id).await.unwrap();
        let second = coordinator.fetch(&id).await.unwrap();

        assert_eq!(first.freshness, Freshness::Fresh);
        assert_eq!(second.freshness, Freshness::Cached);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_refetch() {
        let clock = Arc::new(ManualClock::new());
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(airborne_record()),
            Ok(airborne_record()),
        ]));
        let coordinator = FetchCoordinator::with_clock(
            Arc::clone(&provider),
            Duration::from_secs(10),
            clock.clone(),
        );
        let id = flight_id("UA837");

        coordinator.fetch(&id).await.unwrap();
        clock.advance(Duration::from_secs(11));
        let report = coordinator.fetch(&id).await.unwrap();

        assert_eq!(report.freshness, Freshness::Fresh);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_provider_call() {
        let provider = Arc::new(
            ScriptedProvider::new(vec![Ok(airborne_record())])
                .with_delay(Duration::from_millis(50)),
        );
        let coordinator = Arc::new(FetchCoordinator::new(
            Arc::clone(&provider),
            Duration::from_secs(10),
        ));
        let id = flight_id("UA837");

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                let id = id.clone();
                tokio::spawn(async move { coordinator.fetch(&id).await })
            })
            .collect();

        for handle in handles {
            let report = handle.await.unwrap().unwrap();
            assert_eq!(report.snapshot.flight_number, "UA837");
        }
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_falls_back_to_stale() {
        let clock = Arc::new(ManualClock::new());
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(airborne_record()),
            Err(ProviderError::RateLimited),
        ]));
        let coordinator = FetchCoordinator::with_clock(
            Arc::clone(&provider),
            Duration::from_secs(10),
            clock.clone(),
        );
        let id = flight_id("UA837");

        coordinator.fetch(&id).await.unwrap();
        clock.advance(Duration::from_secs(11));
        let report = coordinator.fetch(&id).await.unwrap();

        assert_eq!(report.freshness, Freshness::Stale);
        assert!(report.freshness.is_stale());
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_transient_failure_without_cache_is_an_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(
            ProviderError::Unavailable("upstream 503".to_string()),
        )]));
        let coordinator = FetchCoordinator::new(provider, Duration::from_secs(10));

        let err = coordinator.fetch(&flight_id("UA837")).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Provider(ProviderError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_not_found_never_serves_stale() {
        let clock = Arc::new(ManualClock::new());
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(airborne_record()),
            Err(ProviderError::NotFound("UA837".to_string())),
        ]));
        let coordinator = FetchCoordinator::with_clock(
            Arc::clone(&provider),
            Duration::from_secs(10),
            clock.clone(),
        );
        let id = flight_id("UA837");

        coordinator.fetch(&id).await.unwrap();
        clock.advance(Duration::from_secs(11));
        let err = coordinator.fetch(&id).await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::Provider(ProviderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_record_fails_normalization() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(RawFlightRecord::default())]));
        let coordinator = FetchCoordinator::new(provider, Duration::from_secs(10));

        let err = coordinator.fetch(&flight_id("UA837")).await.unwrap_err();
        assert!(matches!(err, FetchError::Normalize(_)));
    }

    #[tokio::test]
    async fn test_caller_cancellation_does_not_abort_shared_fetch() {
        let provider = Arc::new(
            ScriptedProvider::new(vec![Ok(airborne_record())])
                .with_delay(Duration::from_millis(50)),
        );
        let coordinator = Arc::new(FetchCoordinator::new(
            Arc::clone(&provider),
            Duration::from_secs(10),
        ));
        let id = flight_id("UA837");

        // Leader starts the fetch, then its caller goes away
        let leader = {
            let coordinator = Arc::clone(&coordinator);
            let id = id.clone();
            tokio::spawn(async move { coordinator.fetch(&id).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        leader.abort();

        // A waiter that joined the same fetch still gets the result
        let report = coordinator.fetch(&id).await.unwrap();
        assert_eq!(report.snapshot.flight_number, "UA837");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_stats_reflect_coalescing() {
        let provider = Arc::new(
            ScriptedProvider::new(vec![Ok(airborne_record())])
                .with_delay(Duration::from_millis(50)),
        );
        let coordinator = Arc::new(FetchCoordinator::new(
            Arc::clone(&provider),
            Duration::from_secs(10),
        ));
        let id = flight_id("UA837");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                let id = id.clone();
                tokio::spawn(async move { coordinator.fetch(&id).await })
            })
            .collect();
        futures::future::join_all(handles).await;

        let stats = coordinator.stats().await;
        assert_eq!(stats.new_requests, 1);
        assert_eq!(stats.coalesced_requests, 3);
        assert_eq!(coordinator.cached_count(), 1);
    }
}
