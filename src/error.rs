//! Error types for fetching, transforming and configuring the pollen feed.
//!
//! An unknown severity is not an error: it surfaces as `None` wherever a
//! [`SeverityLevel`](crate::severity::SeverityLevel) is expected.

use std::time::Duration;

use crate::pollen::PollenType;
use crate::region::RegionId;

/// Failures while retrieving the raw feed. All of them are transient from the
/// service's point of view: the next scheduled refresh simply tries again.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid feed URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("feed returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("feed body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// The payload was valid JSON but not a usable pollen feed.
#[derive(Debug, thiserror::Error)]
pub enum MalformedFeedError {
    #[error("unexpected feed structure: {0}")]
    Structure(#[source] serde_json::Error),
    #[error("cannot parse timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("code '{code}' for {pollen} in region {region} is missing from the legend")]
    UnknownCode {
        code: String,
        region: RegionId,
        pollen: PollenType,
    },
}

/// Outcome of one failed refresh cycle.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Malformed(#[from] MalformedFeedError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
