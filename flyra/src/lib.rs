//! Flyra - Flight state aggregation service
//!
//! This library provides the backend core for a flight-tracking app:
//! it fetches live telemetry for a flight from an upstream provider,
//! reconciles partial payloads into a canonical immutable [`snapshot::FlightSnapshot`],
//! derives ETA and distance remaining, and shields the rate-limited
//! upstream from duplicate concurrent fetches with a freshness-gated
//! single-flight cache.
//!
//! # High-Level API
//!
//! The [`service`] module provides the public query boundary:
//!
//! ```ignore
//! use std::sync::Arc;
//! use flyra::provider::{AsyncReqwestClient, Fr24Provider};
//! use flyra::service::{FlightQueryService, ServiceConfig};
//!
//! let config = ServiceConfig::default();
//! let http = AsyncReqwestClient::with_timeout(config.provider_timeout);
//! let provider = Arc::new(Fr24Provider::new(http, "api-token"));
//! let service = FlightQueryService::new(provider, config);
//!
//! let report = service.get_flight("UA837").await?;
//! println!("{} is {}", report.snapshot.flight_number, report.snapshot.status);
//! ```

pub mod aggregator;
pub mod airport;
pub mod coord;
pub mod logging;
pub mod provider;
pub mod service;
pub mod snapshot;
pub mod time;

/// Version of the Flyra library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
