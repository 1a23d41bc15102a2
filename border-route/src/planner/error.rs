//! Route search errors.

use std::fmt;
use std::time::Duration;

use crate::countries::CountryError;
use crate::domain::{CountryCode, InvalidCountryCode};
use crate::error::ErrorCode;

/// Which end of the requested route an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Error from route search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RouteError {
    /// Fetching a country failed
    #[error(transparent)]
    Country(#[from] CountryError),

    /// Malformed input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An endpoint has no land borders, so no land route can start or end there
    #[error("{endpoint} country {code} has no land borders; choose another country")]
    NoLandBorders { endpoint: Endpoint, code: CountryCode },

    /// The search deadline expired
    #[error("route search timed out after {0:?}")]
    Timeout(Duration),
}

impl RouteError {
    /// Stable classification of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            RouteError::Country(e) => e.code(),
            RouteError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            RouteError::NoLandBorders { .. } => ErrorCode::NoLandBorders,
            RouteError::Timeout(_) => ErrorCode::Timeout,
        }
    }

    /// Whether this error aborts the whole search rather than one branch.
    pub fn is_fatal(&self) -> bool {
        match self {
            RouteError::Country(e) => e.is_fatal(),
            RouteError::InvalidArgument(_) => false,
            RouteError::NoLandBorders { .. } | RouteError::Timeout(_) => true,
        }
    }
}

impl From<InvalidCountryCode> for RouteError {
    fn from(err: InvalidCountryCode) -> Self {
        RouteError::InvalidArgument(err.to_string())
    }
}
