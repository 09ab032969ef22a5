//! FlightRadar24 live-positions provider.
//!
//! Fetches real-time flight data from the FlightRadar24 API's
//! live flight-positions endpoint, authenticated with a Bearer token.
//!
//! # Request shapes
//!
//! - Lookup by flight number: `{base}?flights=UA837`
//! - Lookup by callsign (fallback): `{base}?callsigns=UA837`
//! - Route search: `{base}?routes=JFK-LAX&limit=10`
//!
//! A flight-number lookup that returns no rows is retried once as a
//! callsign lookup before reporting `NotFound`, since callers pass
//! either form interchangeably.

use serde::Deserialize;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::{FlightProvider, ProviderError, RawFlightRecord, RouteQuery};
use crate::snapshot::FlightId;

/// Default base URL for the live flight-positions endpoint.
pub const DEFAULT_BASE_URL: &str = "https://fr24api.flightradar24.com/api/live/flight-positions/full";

/// Top-level envelope of the live-positions response.
///
/// Only the `data` array is deserialized; other fields are ignored.
#[derive(Debug, Deserialize)]
struct Fr24Envelope {
    #[serde(default)]
    data: Vec<RawFlightRecord>,
}

/// FlightRadar24 live flight-data provider.
///
/// Generic over the HTTP client so tests can inject a mock transport.
pub struct Fr24Provider<C: AsyncHttpClient> {
    http: C,
    api_token: String,
    base_url: String,
}

impl<C: AsyncHttpClient> Fr24Provider<C> {
    /// Creates a provider with the default base URL.
    pub fn new(http: C, api_token: impl Into<String>) -> Self {
        Self {
            http,
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the base URL (for tests or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn flights_url(&self, id: &FlightId) -> String {
        format!("{}?flights={}", self.base_url, id)
    }

    fn callsigns_url(&self, id: &FlightId) -> String {
        format!("{}?callsigns={}", self.base_url, id)
    }

    fn routes_url(&self, route: &RouteQuery, limit: usize) -> String {
        format!(
            "{}?routes={}&limit={}",
            self.base_url,
            route.to_route_param(),
            limit
        )
    }

    /// Issues one GET and decodes the envelope, classifying HTTP errors.
    async fn get_records(&self, url: &str) -> Result<Vec<RawFlightRecord>, ProviderError> {
        let response = self.http.get_with_bearer(url, &self.api_token).await?;

        match response.status {
            status if response.is_success() => {
                let envelope: Fr24Envelope = serde_json::from_slice(&response.body)
                    .map_err(|e| ProviderError::Malformed(format!("invalid JSON: {}", e)))?;
                debug!(url = url, records = envelope.data.len(), status = status, "provider response decoded");
                Ok(envelope.data)
            }
            404 => Ok(Vec::new()),
            429 => Err(ProviderError::RateLimited),
            status if status >= 500 => Err(ProviderError::Unavailable(format!(
                "upstream returned HTTP {}",
                status
            ))),
            status => Err(ProviderError::Unavailable(format!(
                "unexpected HTTP {} from provider",
                status
            ))),
        }
    }
}

impl<C: AsyncHttpClient> FlightProvider for Fr24Provider<C> {
    async fn fetch_flight(&self, id: &FlightId) -> Result<RawFlightRecord, ProviderError> {
        let mut records = self.get_records(&self.flights_url(id)).await?;

        if records.is_empty() {
            // The identifier may be a callsign rather than a flight number
            records = self.get_records(&self.callsigns_url(id)).await?;
        }

        records
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    async fn search_route(
        &self,
        route: &RouteQuery,
        limit: usize,
    ) -> Result<Vec<RawFlightRecord>, ProviderError> {
        self.get_records(&self.routes_url(route, limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::http::tests::MockAsyncHttpClient;
    use super::*;

    fn flight_id(raw: &str) -> FlightId {
        FlightId::new(raw).unwrap()
    }

    const ONE_FLIGHT: &str = r#"{
        "data": [
            {
                "fr24_id": "3a1b2c3d",
                "flight": "UA837",
                "callsign": "UAL837",
                "status": "Active",
                "alt": 37000,
                "gspeed": 550,
                "lat": 36.12,
                "lon": -140.5,
                "track": 290,
                "orig_iata": "SFO",
                "dest_iata": "NRT"
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_fetch_flight_decodes_record() {
        let provider = Fr24Provider::new(MockAsyncHttpClient::with_body(200, ONE_FLIGHT), "tok");

        let record = provider.fetch_flight(&flight_id("UA837")).await.unwrap();
        assert_eq!(record.fr24_id.as_deref(), Some("3a1b2c3d"));
        assert_eq!(record.flight.as_deref(), Some("UA837"));
        assert_eq!(record.alt, Some(37000.0));
        assert_eq!(record.dest_iata.as_deref(), Some("NRT"));
    }

    #[tokio::test]
    async fn test_fetch_flight_empty_data_is_not_found() {
        let provider =
            Fr24Provider::new(MockAsyncHttpClient::with_body(200, r#"{"data": []}"#), "tok");

        let err = provider.fetch_flight(&flight_id("UA837")).await.unwrap_err();
        assert_eq!(err, ProviderError::NotFound("UA837".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_flight_404_is_not_found() {
        let provider = Fr24Provider::new(MockAsyncHttpClient::with_body(404, ""), "tok");

        let err = provider.fetch_flight(&flight_id("UA837")).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_429_maps_to_rate_limited() {
        let provider = Fr24Provider::new(MockAsyncHttpClient::with_body(429, ""), "tok");

        let err = provider.fetch_flight(&flight_id("UA837")).await.unwrap_err();
        assert_eq!(err, ProviderError::RateLimited);
    }

    #[tokio::test]
    async fn test_5xx_maps_to_unavailable() {
        let provider = Fr24Provider::new(MockAsyncHttpClient::with_body(503, ""), "tok");

        let err = provider.fetch_flight(&flight_id("UA837")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let provider = Fr24Provider::new(MockAsyncHttpClient::with_body(200, "not json"), "tok");

        let err = provider.fetch_flight(&flight_id("UA837")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_envelope_tolerates_extra_fields() {
        let body = r#"{
            "data": [{"fr24_id": "x1", "flight": "AA100", "squawk": "7000", "vspeed": -64}],
            "meta": {"count": 1}
        }"#;
        let provider = Fr24Provider::new(MockAsyncHttpClient::with_body(200, body), "tok");

        let record = provider.fetch_flight(&flight_id("AA100")).await.unwrap();
        assert_eq!(record.fr24_id.as_deref(), Some("x1"));
    }

    #[tokio::test]
    async fn test_search_route_returns_all_matches() {
        let body = r#"{
            "data": [
                {"fr24_id": "a", "flight": "UA100", "orig_iata": "JFK", "dest_iata": "LAX"},
                {"fr24_id": "b", "flight": "AA200", "orig_iata": "JFK", "dest_iata": "LAX"}
            ]
        }"#;
        let provider = Fr24Provider::new(MockAsyncHttpClient::with_body(200, body), "tok");
        let route = RouteQuery::new(Some("JFK"), Some("LAX")).unwrap();

        let records = provider.search_route(&route, 10).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_url_building() {
        let provider = Fr24Provider::new(MockAsyncHttpClient::with_body(200, "{}"), "tok")
            .with_base_url("http://localhost/live");

        assert_eq!(
            provider.flights_url(&flight_id("ua837")),
            "http://localhost/live?flights=UA837"
        );
        let route = RouteQuery::new(Some("JFK"), None).unwrap();
        assert_eq!(
            provider.routes_url(&route, 5),
            "http://localhost/live?routes=JFK-&limit=5"
        );
    }
}
