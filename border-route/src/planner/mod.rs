//! Land route planner over the country border graph.
//!
//! Answers "which countries do I cross to get from A to B by land?". The
//! border graph is never loaded up front: the planner starts from the two
//! endpoints and fetches neighbours through a
//! [`CountryRepository`](crate::repository::CountryRepository) as the search
//! reaches them, preferring neighbours that lie closer to the destination.

mod config;
mod error;
mod search;


pub use config::{RoutePolicy, SearchConfig};
pub use error::{Endpoint, RouteError};
pub use search::{Planner, Route, SearchResult};
