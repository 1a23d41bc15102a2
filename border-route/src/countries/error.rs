//! Country source error types.

use std::sync::Arc;

use crate::error::ErrorCode;

use super::convert::ConversionError;

/// Errors that can occur when fetching countries from a source.
///
/// `Clone` so that one failed fetch can be handed to every caller that was
/// waiting on the same code.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CountryError {
    /// HTTP request failed (connect error, timeout, broken body)
    #[error("HTTP error: {0}")]
    Http(#[source] Arc<reqwest::Error>),

    /// The source rejected the request as malformed
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// The source has no country with this code
    #[error("country {code} not found")]
    NotFound { code: String },

    /// The response did not have the expected shape
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// The source answered with a server error
    #[error("country source unavailable (status {status}): {message}")]
    Unavailable { status: u16, message: String },

    /// Any other non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failure outside the remote exchange (e.g. unreadable mock data)
    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl CountryError {
    /// Stable classification of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CountryError::Http(_) | CountryError::Unavailable { .. } => ErrorCode::NetworkError,
            CountryError::BadRequest { .. } => ErrorCode::InvalidArgument,
            CountryError::NotFound { .. } => ErrorCode::NotFound,
            CountryError::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            CountryError::Api { .. } | CountryError::Unexpected { .. } => {
                ErrorCode::UnexpectedError
            }
        }
    }

    /// Whether the source as a whole is unusable.
    ///
    /// A fatal error aborts a route search; anything else only ends the
    /// branch that hit it.
    pub fn is_fatal(&self) -> bool {
        match self {
            CountryError::Http(e) => e.is_connect(),
            CountryError::Unavailable { .. } => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for CountryError {
    fn from(err: reqwest::Error) -> Self {
        CountryError::Http(Arc::new(err))
    }
}

impl From<ConversionError> for CountryError {
    fn from(err: ConversionError) -> Self {
        CountryError::InvalidResponse {
            message: err.to_string(),
        }
    }
}
