//! Query service: the public entry point over the aggregation stack.

mod config;
mod error;
mod query;

pub use config::{
    ServiceConfig, DEFAULT_FRESHNESS_TTL, DEFAULT_SEARCH_LIMIT, LEGACY_TOKEN_ENV_VAR,
    MAX_SEARCH_RESULTS, TOKEN_ENV_VAR,
};
pub use error::QueryError;
pub use query::FlightQueryService;
