//! The remote country-data seam.

use std::future::Future;

use crate::domain::{Country, CountryCode};

use super::error::CountryError;

/// A source of country records.
///
/// This abstraction lets the repository and planner run against the real
/// REST API or an in-memory mock. Implementations perform exactly one remote
/// round-trip per call; caching belongs to the repository.
pub trait CountrySource {
    /// Fetch the record(s) for one code.
    ///
    /// Usually a single country, but some sources answer with a list (for
    /// example when the code is an alternate code shared by several records).
    /// The caller picks the entry it asked for.
    fn fetch_by_code(
        &self,
        code: CountryCode,
    ) -> impl Future<Output = Result<Vec<Country>, CountryError>> + Send;

    /// Fetch every country the source knows.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Country>, CountryError>> + Send;
}
