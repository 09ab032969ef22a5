//! Upstream flight-data provider client.
//!
//! One outbound HTTPS call per operation, no retries at this layer;
//! the fetch coordinator owns retry and stale-fallback policy. The
//! [`FlightProvider`] trait is the seam the coordinator and tests
//! program against; [`Fr24Provider`] is the real FlightRadar24 client.

mod fr24;
mod http;
mod types;

pub use fr24::{Fr24Provider, DEFAULT_BASE_URL};
pub use http::{AsyncHttpClient, AsyncReqwestClient, HttpResponse, DEFAULT_TIMEOUT};
pub use types::{FlightProvider, ProviderError, RawFlightRecord, RouteQuery};
