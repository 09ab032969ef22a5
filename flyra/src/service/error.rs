//! Query-level error taxonomy.

use crate::aggregator::FetchError;
use crate::provider::ProviderError;

/// Error returned to callers of the query service.
///
/// Each variant maps to the HTTP status an API gateway in front of this
/// service would return, via [`QueryError::status_code`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("flight identifier is empty or malformed")]
    InvalidIdentifier,
    #[error("no live data for flight {0}")]
    NotFound(String),
    #[error("upstream provider rate limit exceeded")]
    RateLimited,
    #[error("upstream provider unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("upstream provider timed out")]
    Timeout,
    #[error("upstream returned malformed data: {0}")]
    MalformedUpstreamData(String),
}

impl QueryError {
    /// HTTP status code this error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidIdentifier => 400,
            Self::NotFound(_) => 404,
            Self::RateLimited => 429,
            Self::UpstreamUnavailable(_) => 503,
            Self::Timeout => 504,
            Self::MalformedUpstreamData(_) => 502,
        }
    }
}

impl From<ProviderError> for QueryError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(id) => Self::NotFound(id),
            ProviderError::RateLimited => Self::RateLimited,
            ProviderError::Unavailable(msg) => Self::UpstreamUnavailable(msg),
            ProviderError::Timeout(_) => Self::Timeout,
            ProviderError::Malformed(msg) => Self::MalformedUpstreamData(msg),
        }
    }
}

impl From<FetchError> for QueryError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Provider(e) => e.into(),
            FetchError::Normalize(e) => Self::MalformedUpstreamData(e.to_string()),
        }
    }
}
