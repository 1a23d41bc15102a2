//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::planner::SearchConfig;
use crate::repository::CountryRepository;

use super::dto::CountrySummary;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
pub struct AppState<S> {
    /// Cached country repository, shared by every search
    pub repository: Arc<CountryRepository<S>>,

    /// Route search configuration
    pub config: Arc<SearchConfig>,

    /// Selection list, loaded on first use
    pub countries: Arc<OnceCell<Vec<CountrySummary>>>,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: Arc::clone(&self.config),
            countries: Arc::clone(&self.countries),
        }
    }
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(repository: CountryRepository<S>, config: SearchConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            config: Arc::new(config),
            countries: Arc::new(OnceCell::new()),
        }
    }
}
