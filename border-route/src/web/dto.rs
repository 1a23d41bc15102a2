//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Country, CountryCode};
use crate::error::ErrorCode;
use crate::planner::{Route, SearchResult};

/// Query string of a route search.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// Origin country code (case-insensitive)
    pub from: String,

    /// Destination country code (case-insensitive)
    pub to: String,

    /// Overrides the configured depth limit
    pub max_depth: Option<usize>,
}

/// Response to a route search.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub found: bool,
    pub routes: Vec<RouteView>,

    /// Remote requests the search issued
    pub requests: u64,
}

impl From<SearchResult> for RouteResponse {
    fn from(result: SearchResult) -> Self {
        Self {
            found: result.found,
            routes: result.routes.into_iter().map(RouteView::from).collect(),
            requests: result.requests,
        }
    }
}

/// One route, origin first.
#[derive(Debug, Serialize)]
pub struct RouteView {
    pub codes: Vec<CountryCode>,
    pub names: Vec<String>,
}

impl From<Route> for RouteView {
    fn from(route: Route) -> Self {
        Self {
            codes: route.codes,
            names: route.names,
        }
    }
}

/// Country selection list.
#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<CountrySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountrySummary {
    pub code: CountryCode,
    pub name: String,
}

impl From<&Country> for CountrySummary {
    fn from(country: &Country) -> Self {
        Self {
            code: country.code,
            name: country.name.clone(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable error code, e.g. `NO_LAND_BORDERS`
    pub code: ErrorCode,

    pub error: String,
}
