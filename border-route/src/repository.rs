//! Memoizing country repository.
//!
//! Wraps a [`CountrySource`] with a cache keyed by country code. Countries
//! never change during a session, so entries are kept for the lifetime of the
//! repository: no TTL, no eviction, and the first stored record for a code is
//! authoritative.
//!
//! Concurrent lookups of the same uncached code are coalesced into a single
//! in-flight fetch, so a code is requested from the source at most once per
//! repository instance.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::try_join_all;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::countries::{CountryError, CountrySource};
use crate::domain::{Country, CountryCode};

/// Counts remote round-trips attributed to one caller (e.g. one search).
#[derive(Debug, Default)]
pub struct RequestTally(AtomicU64);

impl RequestTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round-trips recorded so far.
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Country source with caching and request accounting.
pub struct CountryRepository<S> {
    source: S,

    /// Fetched countries, keyed by code.
    cache: MokaCache<CountryCode, Arc<Country>>,

    /// Remote round-trips issued by this repository.
    requests: AtomicU64,
}

impl<S: CountrySource + Sync> CountryRepository<S> {
    /// Create a repository with an empty cache.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: MokaCache::builder().build(),
            requests: AtomicU64::new(0),
        }
    }

    /// Get a country, fetching it on a cache miss.
    pub async fn get_by_code(&self, code: CountryCode) -> Result<Arc<Country>, CountryError> {
        self.fetch(code, None).await
    }

    /// Get several countries concurrently, preserving input order.
    ///
    /// Fails fast: the first error to complete is returned and the remaining
    /// lookups are dropped.
    pub async fn get_by_codes(
        &self,
        codes: &[CountryCode],
    ) -> Result<Vec<Arc<Country>>, CountryError> {
        try_join_all(codes.iter().map(|&code| self.fetch(code, None))).await
    }

    /// [`get_by_code`](Self::get_by_code), attributing any remote fetch to
    /// `tally`.
    pub async fn get_by_code_tallied(
        &self,
        code: CountryCode,
        tally: &RequestTally,
    ) -> Result<Arc<Country>, CountryError> {
        self.fetch(code, Some(tally)).await
    }

    /// [`get_by_codes`](Self::get_by_codes), attributing remote fetches to
    /// `tally`.
    pub async fn get_by_codes_tallied(
        &self,
        codes: &[CountryCode],
        tally: &RequestTally,
    ) -> Result<Vec<Arc<Country>>, CountryError> {
        try_join_all(codes.iter().map(|&code| self.fetch(code, Some(tally)))).await
    }

    /// Fetch the full country list in one request and seed the cache.
    ///
    /// Returned sorted by display name.
    pub async fn get_all(&self) -> Result<Vec<Arc<Country>>, CountryError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let fetched = self.source.fetch_all().await?;

        let mut countries = Vec::with_capacity(fetched.len());
        for country in fetched {
            countries.push(self.store(country).await);
        }
        countries.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(count = countries.len(), "seeded country cache");
        Ok(countries)
    }

    /// Look up a cached country without fetching.
    pub async fn cached(&self, code: &CountryCode) -> Option<Arc<Country>> {
        self.cache.get(code).await
    }

    /// Total remote round-trips issued so far.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of cached countries.
    pub fn cached_count(&self) -> usize {
        self.cache.iter().count()
    }

    /// Access the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    async fn fetch(
        &self,
        code: CountryCode,
        tally: Option<&RequestTally>,
    ) -> Result<Arc<Country>, CountryError> {
        self.cache
            .try_get_with(code, async {
                self.requests.fetch_add(1, Ordering::SeqCst);
                if let Some(tally) = tally {
                    tally.record();
                }
                debug!(code = %code, "cache miss, fetching country");

                let answer = self.source.fetch_by_code(code).await?;
                self.pick(code, answer).await
            })
            .await
            .map_err(|e| (*e).clone())
    }

    /// Cache every other record of a by-code answer and return the one asked
    /// for.
    async fn pick(
        &self,
        requested: CountryCode,
        answer: Vec<Country>,
    ) -> Result<Arc<Country>, CountryError> {
        let mut wanted = None;
        for country in answer {
            if country.code == requested {
                if wanted.is_none() {
                    wanted = Some(Arc::new(country));
                }
            } else {
                self.store(country).await;
            }
        }

        wanted.ok_or_else(|| CountryError::InvalidResponse {
            message: format!("response for {requested} does not contain {requested}"),
        })
    }

    /// Insert unless already cached; returns the authoritative entry.
    async fn store(&self, country: Country) -> Arc<Country> {
        self.cache
            .entry(country.code)
            .or_insert(Arc::new(country))
            .await
            .into_value()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::countries::MockCountrySource;
    use crate::domain::Coordinates;

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    fn country(c: &str, name: &str, borders: &[&str]) -> Country {
        Country::new(
            code(c),
            name,
            Coordinates::new(10.0, 10.0).unwrap(),
            borders.iter().map(|b| code(b)).collect(),
        )
    }

    fn source() -> MockCountrySource {
        MockCountrySource::new([
            country("AAA", "Alpha", &["BBB"]),
            country("BBB", "Bravo", &["AAA", "CCC"]),
            country("CCC", "Charlie", &["BBB"]),
        ])
    }

    #[tokio::test]
    async fn sequential_lookups_fetch_once() {
        let repo = CountryRepository::new(source());

        let first = repo.get_by_code(code("AAA")).await.unwrap();
        let second = repo.get_by_code(code("AAA")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.request_count(), 1);
        assert_eq!(repo.source().fetch_count(&code("AAA")).await, 1);
    }

    #[tokio::test]
    async fn concurrent_lookups_are_coalesced() {
        let repo = CountryRepository::new(source().with_delay(Duration::from_millis(20)));

        let lookups = (0..8).map(|_| repo.get_by_code(code("BBB")));
        let results = futures::future::join_all(lookups).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(repo.request_count(), 1);
        assert_eq!(repo.source().fetch_count(&code("BBB")).await, 1);
    }

    #[tokio::test]
    async fn batch_preserves_order() {
        let repo = CountryRepository::new(source());
        let codes = [code("CCC"), code("AAA"), code("BBB")];

        let countries = repo.get_by_codes(&codes).await.unwrap();

        let got: Vec<_> = countries.iter().map(|c| c.code).collect();
        assert_eq!(got, codes);
        assert_eq!(repo.request_count(), 3);
    }

    #[tokio::test]
    async fn batch_fails_fast() {
        let repo = CountryRepository::new(source());
        let err = repo
            .get_by_codes(&[code("AAA"), code("ZZZ")])
            .await
            .unwrap_err();
        assert!(matches!(err, CountryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_answer_caches_every_entry() {
        let repo = CountryRepository::new(source().with_list_answers());

        let bbb = repo.get_by_code(code("BBB")).await.unwrap();
        assert_eq!(bbb.name, "Bravo");
        assert_eq!(repo.request_count(), 1);

        // Neighbours arrived in the same response
        repo.get_by_code(code("AAA")).await.unwrap();
        repo.get_by_code(code("CCC")).await.unwrap();
        assert_eq!(repo.request_count(), 1);
        assert_eq!(repo.cached_count(), 3);
    }

    #[tokio::test]
    async fn list_answer_without_requested_code_is_invalid() {
        // The mock answers ZZZ lookups with AAA's record
        struct Mismatched;
        impl CountrySource for Mismatched {
            async fn fetch_by_code(&self, _: CountryCode) -> Result<Vec<Country>, CountryError> {
                Ok(vec![country("AAA", "Alpha", &[])])
            }
            async fn fetch_all(&self) -> Result<Vec<Country>, CountryError> {
                Ok(vec![])
            }
        }

        let repo = CountryRepository::new(Mismatched);
        let err = repo.get_by_code(code("ZZZ")).await.unwrap_err();
        assert!(matches!(err, CountryError::InvalidResponse { .. }));
        // The stray record is still cached
        assert!(repo.cached(&code("AAA")).await.is_some());
    }

    #[tokio::test]
    async fn get_all_counts_one_request_and_seeds_cache() {
        let repo = CountryRepository::new(source());

        let all = repo.get_all().await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
        assert_eq!(repo.request_count(), 1);

        repo.get_by_codes(&[code("AAA"), code("BBB"), code("CCC")])
            .await
            .unwrap();
        assert_eq!(repo.request_count(), 1);
        assert_eq!(repo.source().total_fetches().await, 0);
    }

    #[tokio::test]
    async fn first_stored_record_is_authoritative() {
        let repo = CountryRepository::new(source());
        let original = repo.get_by_code(code("AAA")).await.unwrap();

        repo.store(country("AAA", "Impostor", &[])).await;

        let cached = repo.cached(&code("AAA")).await.unwrap();
        assert_eq!(cached.name, original.name);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let repo = CountryRepository::new(source());
        assert!(repo.get_by_code(code("ZZZ")).await.is_err());
        assert!(repo.get_by_code(code("ZZZ")).await.is_err());
        assert_eq!(repo.request_count(), 2);
    }

    #[tokio::test]
    async fn tally_counts_only_own_misses() {
        let repo = CountryRepository::new(source());
        repo.get_by_code(code("AAA")).await.unwrap();

        let tally = RequestTally::new();
        repo.get_by_codes_tallied(&[code("AAA"), code("BBB")], &tally)
            .await
            .unwrap();

        assert_eq!(tally.count(), 1);
        assert_eq!(repo.request_count(), 2);
    }
}
