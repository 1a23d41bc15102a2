//! Stable error codes shared by every layer.
//!
//! Callers (the web layer, or any embedding UI) map these to user feedback;
//! the codes never change once published.

use std::fmt;

use serde::Serialize;

/// Machine-readable classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed input codes or coordinates
    InvalidArgument,
    /// The remote source has no record for a code
    NotFound,
    /// The remote response failed shape validation
    InvalidResponse,
    /// Transport-level failure talking to the remote source
    NetworkError,
    /// Origin or destination has no land borders
    NoLandBorders,
    /// The caller's deadline expired before the search finished
    Timeout,
    /// Anything else
    UnexpectedError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::NoLandBorders => "NO_LAND_BORDERS",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
