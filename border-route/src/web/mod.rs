//! Web layer for the land route finder.
//!
//! Provides JSON endpoints for listing countries and searching routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
