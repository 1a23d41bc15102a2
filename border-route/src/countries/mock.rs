//! Mock country source for testing without API access.
//!
//! Serves countries from memory, or from a JSON file in the same shape as
//! the REST `/all` response, as if they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::{Country, CountryCode};

use super::convert::convert_countries;
use super::error::CountryError;
use super::source::CountrySource;
use super::types::CountryDto;

/// In-memory country source that records how often it is asked.
///
/// Clones share the same data and counters.
#[derive(Clone, Debug, Default)]
pub struct MockCountrySource {
    countries: Arc<HashMap<CountryCode, Country>>,

    /// Codes that answer with a scripted error instead of data.
    failures: Arc<HashMap<CountryCode, CountryError>>,

    /// Answer by-code lookups with the country plus its known neighbours.
    list_answers: bool,

    /// Artificial latency per request.
    delay: Option<Duration>,

    fetches: Arc<Mutex<HashMap<CountryCode, usize>>>,
    all_fetches: Arc<AtomicUsize>,
}

impl MockCountrySource {
    /// Create a source serving the given countries.
    pub fn new(countries: impl IntoIterator<Item = Country>) -> Self {
        Self {
            countries: Arc::new(countries.into_iter().map(|c| (c.code, c)).collect()),
            ..Self::default()
        }
    }

    /// Load countries from a JSON array of REST-format records.
    pub fn from_json_file(
        path: impl AsRef<Path>,
        language: Option<&str>,
    ) -> Result<Self, CountryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| CountryError::Unexpected {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_json_str(&json, language)
    }

    /// Parse countries from a JSON array of REST-format records.
    pub fn from_json_str(json: &str, language: Option<&str>) -> Result<Self, CountryError> {
        let dtos: Vec<CountryDto> =
            serde_json::from_str(json).map_err(|e| CountryError::InvalidResponse {
                message: e.to_string(),
            })?;
        let countries = convert_countries(&dtos, language)?;
        Ok(Self::new(countries))
    }

    /// Make lookups of `code` fail with `error`.
    pub fn with_failure(mut self, code: CountryCode, error: CountryError) -> Self {
        Arc::make_mut(&mut self.failures).insert(code, error);
        self
    }

    /// Answer by-code lookups with a list: the requested country first,
    /// followed by every known neighbour.
    pub fn with_list_answers(mut self) -> Self {
        self.list_answers = true;
        self
    }

    /// Delay every response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of by-code requests made for `code`.
    pub async fn fetch_count(&self, code: &CountryCode) -> usize {
        self.fetches.lock().await.get(code).copied().unwrap_or(0)
    }

    /// Total number of by-code requests.
    pub async fn total_fetches(&self) -> usize {
        self.fetches.lock().await.values().sum()
    }

    /// Number of fetch-all requests.
    pub fn all_fetches(&self) -> usize {
        self.all_fetches.load(Ordering::SeqCst)
    }

    /// Number of countries served.
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    async fn lookup(&self, code: CountryCode) -> Result<Vec<Country>, CountryError> {
        *self.fetches.lock().await.entry(code).or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.failures.get(&code) {
            return Err(err.clone());
        }

        let country = self
            .countries
            .get(&code)
            .ok_or_else(|| CountryError::NotFound {
                code: code.to_string(),
            })?;

        if !self.list_answers {
            return Ok(vec![country.clone()]);
        }

        let mut answer = vec![country.clone()];
        answer.extend(
            country
                .borders
                .iter()
                .filter_map(|b| self.countries.get(b))
                .cloned(),
        );
        Ok(answer)
    }
}

impl CountrySource for MockCountrySource {
    async fn fetch_by_code(&self, code: CountryCode) -> Result<Vec<Country>, CountryError> {
        self.lookup(code).await
    }

    async fn fetch_all(&self) -> Result<Vec<Country>, CountryError> {
        self.all_fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.countries.values().cloned().collect())
    }
}
