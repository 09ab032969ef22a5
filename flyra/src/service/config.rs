//! Service configuration.

use std::time::Duration;

/// Default freshness window for cached snapshots.
pub const DEFAULT_FRESHNESS_TTL: Duration = Duration::from_secs(10);

/// Default number of results returned by a route search.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Hard cap on route search results.
pub const MAX_SEARCH_RESULTS: usize = 100;

/// Environment variable holding the provider API token.
pub const TOKEN_ENV_VAR: &str = "FR24_API_TOKEN";

/// Legacy environment variable checked when [`TOKEN_ENV_VAR`] is unset.
pub const LEGACY_TOKEN_ENV_VAR: &str = "FLIGHTRADARAPI_KEY";

/// Configuration for the flight query service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// How long a cached snapshot counts as fresh.
    pub freshness_ttl: Duration,
    /// Timeout applied to each outbound provider request.
    pub provider_timeout: Duration,
    /// Provider API token. When unset, the environment is consulted.
    pub api_token: Option<String>,
    /// Override for the provider base URL (tests, proxies).
    pub base_url: Option<String>,
    /// Maximum results a route search may return.
    pub max_search_results: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            freshness_ttl: DEFAULT_FRESHNESS_TTL,
            provider_timeout: crate::provider::DEFAULT_TIMEOUT,
            api_token: None,
            base_url: None,
            max_search_results: MAX_SEARCH_RESULTS,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_freshness_ttl(mut self, ttl: Duration) -> Self {
        self.freshness_ttl = ttl;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resolves the API token: explicit config first, then
    /// `FR24_API_TOKEN`, then the legacy `FLIGHTRADARAPI_KEY`.
    pub fn resolve_api_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .or_else(|| std::env::var(LEGACY_TOKEN_ENV_VAR).ok())
            .filter(|t| !t.trim().is_empty())
    }
}
