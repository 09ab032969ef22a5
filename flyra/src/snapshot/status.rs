//! Flight status enumeration and provider-text mapping.

use serde::Serialize;

/// Closed set of flight statuses.
///
/// Provider status text is free-form; it is mapped onto this
/// enumeration by [`FlightStatus::parse`], with the original text kept
/// alongside as a display label for anything that does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    /// Not yet departed (includes "on time" and "delayed" text).
    Scheduled,
    /// Airborne.
    Active,
    /// Arrived.
    Landed,
    /// Cancelled by the operator.
    Cancelled,
    /// Diverted from the filed destination.
    Diverted,
    /// Provider text did not match the known vocabulary.
    #[default]
    Unknown,
}

impl FlightStatus {
    /// Maps provider status text onto the closed enumeration.
    ///
    /// Matching is case-insensitive substring search over the known
    /// vocabulary. Order matters: "cancel" covers both spellings, and
    /// the more specific phrases are tested before "scheduled".
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();

        if lower.contains("cancel") {
            Self::Cancelled
        } else if lower.contains("diverted") {
            Self::Diverted
        } else if lower.contains("landed") {
            Self::Landed
        } else if lower.contains("active") {
            Self::Active
        } else if lower.contains("on time") || lower.contains("delayed") || lower.contains("scheduled") {
            Self::Scheduled
        } else {
            Self::Unknown
        }
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Active => write!(f, "active"),
            Self::Landed => write!(f, "landed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Diverted => write!(f, "diverted"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
