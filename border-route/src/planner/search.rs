//! Land route search over the lazily discovered border graph.
//!
//! Only the endpoints are known up front; every other country is fetched
//! when the search first reaches it. The search expands level by level from
//! the origin, so each level holds the countries one more border crossing
//! away:
//!
//! 1. Every frontier country that borders the destination completes a route.
//!    This check needs no fetches, so it runs for the whole level before any
//!    expansion is started.
//! 2. Otherwise each frontier country becomes a concurrent branch. A branch
//!    claims its not-yet-visited neighbours in the shared visited set, then
//!    fetches them in one batch. Claiming before fetching is what keeps two
//!    branches from fetching (or later expanding) the same country.
//! 3. Each branch orders its neighbours by great-circle distance to the
//!    destination, so the route reported first leans towards the
//!    destination. The next level is the concatenation of all branches'
//!    ordered neighbours.
//!
//! Because countries are claimed at the first level that reaches them, a
//! reported route always has the fewest possible border crossings, and any
//! destination within `max_depth + 1` hops is found.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, info, trace, warn};

use crate::countries::CountrySource;
use crate::domain::{Country, CountryCode};
use crate::repository::{CountryRepository, RequestTally};

use super::config::{RoutePolicy, SearchConfig};
use super::error::{Endpoint, RouteError};

/// A land route: countries from origin to destination inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub codes: Vec<CountryCode>,

    /// Display names, parallel to `codes`.
    pub names: Vec<String>,
}

impl Route {
    fn through(countries: impl IntoIterator<Item = impl AsRef<Country>>) -> Self {
        let (codes, names) = countries
            .into_iter()
            .map(|c| (c.as_ref().code, c.as_ref().name.clone()))
            .unzip();
        Self { codes, names }
    }

    /// Number of border crossings.
    pub fn hops(&self) -> usize {
        self.codes.len().saturating_sub(1)
    }
}

/// Result of a route search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub found: bool,

    /// Empty when nothing was found. With [`RoutePolicy::FirstFound`] at most
    /// one route.
    pub routes: Vec<Route>,

    /// Remote requests issued by this search, endpoint lookups included.
    pub requests: u64,

    /// Number of frontier expansions performed.
    pub levels: usize,
}

/// State shared by every branch of one search.
struct SearchState {
    /// Codes already claimed by some branch.
    visited: Mutex<HashSet<CountryCode>>,

    tally: RequestTally,
}

impl SearchState {
    fn new(origin: CountryCode) -> Self {
        Self {
            visited: Mutex::new(HashSet::from([origin])),
            tally: RequestTally::new(),
        }
    }

    /// Atomically mark every unvisited code in `candidates` as visited and
    /// return those, in their original order.
    fn claim(&self, candidates: &[CountryCode]) -> Vec<CountryCode> {
        let mut visited = self.visited.lock().unwrap_or_else(PoisonError::into_inner);
        candidates
            .iter()
            .copied()
            .filter(|code| visited.insert(*code))
            .collect()
    }
}

/// A frontier entry: a country plus the path that reached it.
struct Branch {
    country: Arc<Country>,

    /// Countries before `country`, starting at the origin.
    prefix: Vec<Arc<Country>>,
}

impl Branch {
    fn root(country: Arc<Country>) -> Self {
        Self {
            country,
            prefix: Vec::new(),
        }
    }

    fn child(&self, country: Arc<Country>) -> Self {
        let mut prefix = self.prefix.clone();
        prefix.push(self.country.clone());
        Self { country, prefix }
    }

    fn route_to(&self, destination: &Arc<Country>) -> Route {
        Route::through(
            self.prefix
                .iter()
                .chain([&self.country, destination]),
        )
    }
}

/// Border-graph route planner.
pub struct Planner<'a, S> {
    repository: &'a CountryRepository<S>,
    config: &'a SearchConfig,
}

impl<'a, S: CountrySource + Sync> Planner<'a, S> {
    /// Create a new planner.
    pub fn new(repository: &'a CountryRepository<S>, config: &'a SearchConfig) -> Self {
        Self { repository, config }
    }

    /// Find a land route using the configured depth limit.
    pub async fn find_route(
        &self,
        origin: CountryCode,
        destination: CountryCode,
    ) -> Result<SearchResult, RouteError> {
        self.find_route_with_depth(origin, destination, self.config.max_depth)
            .await
    }

    /// Find a land route with an explicit depth limit.
    ///
    /// The configured deadline, if any, still applies.
    pub async fn find_route_with_depth(
        &self,
        origin: CountryCode,
        destination: CountryCode,
        max_depth: usize,
    ) -> Result<SearchResult, RouteError> {
        match self.config.deadline {
            Some(deadline) => {
                self.find_route_with_deadline(origin, destination, max_depth, deadline)
                    .await
            }
            None => self.resolve_and_search(origin, destination, max_depth).await,
        }
    }

    /// Find a land route, giving up after `deadline`.
    ///
    /// On expiry every outstanding branch is dropped; fetches already sent
    /// are abandoned.
    pub async fn find_route_with_deadline(
        &self,
        origin: CountryCode,
        destination: CountryCode,
        max_depth: usize,
        deadline: Duration,
    ) -> Result<SearchResult, RouteError> {
        tokio::time::timeout(
            deadline,
            self.resolve_and_search(origin, destination, max_depth),
        )
        .await
        .map_err(|_| {
            warn!(%origin, %destination, ?deadline, "route search timed out");
            RouteError::Timeout(deadline)
        })?
    }

    /// Find a land route between already-resolved countries.
    ///
    /// `requests` in the result only counts fetches made during expansion.
    pub async fn find_route_between(
        &self,
        origin: Arc<Country>,
        destination: Arc<Country>,
        max_depth: usize,
    ) -> Result<SearchResult, RouteError> {
        let state = SearchState::new(origin.code);
        self.search(&state, origin, destination, max_depth).await
    }

    async fn resolve_and_search(
        &self,
        origin: CountryCode,
        destination: CountryCode,
        max_depth: usize,
    ) -> Result<SearchResult, RouteError> {
        let state = SearchState::new(origin);

        let (from, to) = futures::try_join!(
            self.repository.get_by_code_tallied(origin, &state.tally),
            self.repository.get_by_code_tallied(destination, &state.tally),
        )?;

        self.search(&state, from, to, max_depth).await
    }

    async fn search(
        &self,
        state: &SearchState,
        origin: Arc<Country>,
        destination: Arc<Country>,
        max_depth: usize,
    ) -> Result<SearchResult, RouteError> {
        if origin.code == destination.code {
            return Ok(SearchResult {
                found: true,
                routes: vec![Route::through([&origin])],
                requests: state.tally.count(),
                levels: 0,
            });
        }

        if !origin.has_borders() {
            return Err(RouteError::NoLandBorders {
                endpoint: Endpoint::Origin,
                code: origin.code,
            });
        }
        if !destination.has_borders() {
            return Err(RouteError::NoLandBorders {
                endpoint: Endpoint::Destination,
                code: destination.code,
            });
        }

        let mut frontier = vec![Branch::root(origin)];
        let mut level = 0;

        loop {
            let routes = self.completed_routes(&frontier, &destination);
            if !routes.is_empty() {
                info!(
                    destination = %destination.code,
                    routes = routes.len(),
                    hops = routes[0].hops(),
                    requests = state.tally.count(),
                    "route found"
                );
                return Ok(SearchResult {
                    found: true,
                    routes,
                    requests: state.tally.count(),
                    levels: level,
                });
            }

            if level >= max_depth || frontier.is_empty() {
                debug!(
                    level,
                    max_depth,
                    requests = state.tally.count(),
                    "search exhausted without a route"
                );
                return Ok(SearchResult {
                    found: false,
                    routes: Vec::new(),
                    requests: state.tally.count(),
                    levels: level,
                });
            }

            debug!(level, frontier = frontier.len(), "expanding frontier");
            frontier = self.expand_level(state, &frontier, &destination).await?;
            level += 1;
        }
    }

    /// Routes completed by frontier countries that border the destination,
    /// in frontier order.
    fn completed_routes(&self, frontier: &[Branch], destination: &Arc<Country>) -> Vec<Route> {
        let mut hits = frontier
            .iter()
            .filter(|branch| branch.country.borders_on(&destination.code))
            .map(|branch| branch.route_to(destination));

        match self.config.policy {
            RoutePolicy::FirstFound => hits.next().into_iter().collect(),
            RoutePolicy::CollectAll => hits.collect(),
        }
    }

    /// Expand every frontier branch concurrently and build the next level.
    ///
    /// A branch whose fetch fails is dropped; a fatal error aborts the level
    /// and cancels its sibling branches.
    async fn expand_level(
        &self,
        state: &SearchState,
        frontier: &[Branch],
        destination: &Country,
    ) -> Result<Vec<Branch>, RouteError> {
        let branches = frontier.iter().map(|branch| async move {
            match self.expand(state, branch, destination).await {
                Ok(children) => Ok(children),
                Err(e) if e.is_fatal() => Err(e),
                Err(e) => {
                    warn!(
                        country = %branch.country.code,
                        error = %e,
                        "abandoning branch after failed fetch"
                    );
                    Ok(Vec::new())
                }
            }
        });

        let children = try_join_all(branches).await?;
        Ok(children.into_iter().flatten().collect())
    }

    async fn expand(
        &self,
        state: &SearchState,
        branch: &Branch,
        destination: &Country,
    ) -> Result<Vec<Branch>, RouteError> {
        let claimed = state.claim(&branch.country.borders);
        if claimed.is_empty() {
            trace!(country = %branch.country.code, "no unvisited neighbours");
            return Ok(Vec::new());
        }

        let neighbours = self
            .repository
            .get_by_codes_tallied(&claimed, &state.tally)
            .await?;

        let mut ranked: Vec<(u64, Arc<Country>)> = neighbours
            .into_iter()
            .map(|n| (n.coordinates.distance_to(&destination.coordinates), n))
            .collect();
        // Stable: equal distances keep fetch order
        ranked.sort_by_key(|(distance, _)| *distance);

        trace!(
            country = %branch.country.code,
            neighbours = ranked.len(),
            "expanded branch"
        );

        Ok(ranked.into_iter().map(|(_, n)| branch.child(n)).collect())
    }
}
