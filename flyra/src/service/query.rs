//! Flight query service.
//!
//! The top-level entry point callers use: validates identifiers before
//! any network activity, delegates single-flight lookups to the
//! [`FetchCoordinator`], and runs route searches as one-off provider
//! queries.

use std::sync::Arc;

use tracing::{debug, info};

use crate::aggregator::{FetchCoordinator, FlightReport, Freshness};
use crate::provider::{FlightProvider, RouteQuery};
use crate::snapshot::{normalize, FlightId};
use crate::time::{Clock, SystemClock};

use super::config::ServiceConfig;
use super::error::QueryError;

/// Serves flight state queries backed by a caching fetch coordinator.
pub struct FlightQueryService<P> {
    coordinator: FetchCoordinator<P>,
    provider: Arc<P>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl<P: FlightProvider + 'static> FlightQueryService<P> {
    /// Creates a service using the system clock.
    pub fn new(provider: Arc<P>, config: ServiceConfig) -> Self {
        Self::with_clock(provider, config, Arc::new(SystemClock))
    }

    /// Creates a service with an injected clock.
    pub fn with_clock(provider: Arc<P>, config: ServiceConfig, clock: Arc<dyn Clock>) -> Self {
        let coordinator = FetchCoordinator::with_clock(
            Arc::clone(&provider),
            config.freshness_ttl,
            Arc::clone(&clock),
        );
        Self {
            coordinator,
            provider,
            clock,
            config,
        }
    }

    /// Returns the current state of a single flight.
    ///
    /// The identifier is trimmed and uppercased; an empty identifier is
    /// rejected before any provider call is made.
    pub async fn get_flight(&self, identifier: &str) -> Result<FlightReport, QueryError> {
        let id = FlightId::new(identifier).ok_or(QueryError::InvalidIdentifier)?;
        info!(flight = %id, "flight state requested");
        let report = self.coordinator.fetch(&id).await?;
        Ok(report)
    }

    /// Searches for live flights on a route.
    ///
    /// At least one of `departure`/`arrival` must be a non-empty IATA
    /// code. Results are not cached or coalesced; each search is one
    /// provider call. Rows that fail normalization are skipped rather
    /// than failing the whole search.
    pub async fn search_route(
        &self,
        departure: Option<&str>,
        arrival: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<FlightReport>, QueryError> {
        let route =
            RouteQuery::new(departure, arrival).ok_or(QueryError::InvalidIdentifier)?;
        let limit = limit
            .unwrap_or(super::config::DEFAULT_SEARCH_LIMIT)
            .clamp(1, self.config.max_search_results);
        info!(route = %route.to_route_param(), limit = limit, "route search requested");

        let records = self.provider.search_route(&route, limit).await?;
        let total = records.len();
        let now = self.clock.now_utc();

        let reports: Vec<FlightReport> = records
            .iter()
            .filter_map(|raw| normalize(raw, now).ok())
            .map(|snapshot| FlightReport {
                snapshot: Arc::new(snapshot),
                freshness: Freshness::Fresh,
            })
            .collect();

        if reports.len() < total {
            debug!(
                skipped = total - reports.len(),
                "skipped rows with no usable identity"
            );
        }
        Ok(reports)
    }

    /// Coalescing statistics since startup.
    pub async fn stats(&self) -> crate::aggregator::CoalescerStats {
        self.coordinator.stats().await
    }
}
