//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{error, info, warn};

use crate::countries::{CountryError, CountrySource};
use crate::domain::CountryCode;
use crate::error::ErrorCode;
use crate::planner::{Planner, RouteError};

use super::dto::*;
use super::state::AppState;

/// Upper bound on a caller-supplied `max_depth`.
const MAX_DEPTH_LIMIT: usize = 30;

/// Create the application router.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: CountrySource + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/countries", get(list_countries::<S>))
        .route("/api/route", get(find_route::<S>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All countries, sorted by name.
///
/// Fetched once per process; later calls are served from memory.
async fn list_countries<S>(
    State(state): State<AppState<S>>,
) -> Result<Json<CountriesResponse>, AppError>
where
    S: CountrySource + Send + Sync + 'static,
{
    let countries = state
        .countries
        .get_or_try_init(|| async {
            let all = state.repository.get_all().await?;
            Ok::<_, CountryError>(all.iter().map(|c| CountrySummary::from(&**c)).collect())
        })
        .await?;

    Ok(Json(CountriesResponse {
        countries: countries.clone(),
    }))
}

/// Search a land route between two countries.
async fn find_route<S>(
    State(state): State<AppState<S>>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<RouteResponse>, AppError>
where
    S: CountrySource + Send + Sync + 'static,
{
    let Query(query) = query.map_err(|e| AppError {
        code: ErrorCode::InvalidArgument,
        message: e.body_text(),
    })?;

    let from = CountryCode::parse_normalized(&query.from).map_err(RouteError::from)?;
    let to = CountryCode::parse_normalized(&query.to).map_err(RouteError::from)?;
    let max_depth = query
        .max_depth
        .unwrap_or(state.config.max_depth)
        .min(MAX_DEPTH_LIMIT);

    let planner = Planner::new(&state.repository, &state.config);
    let result = planner.find_route_with_depth(from, to, max_depth).await?;

    info!(
        %from,
        %to,
        max_depth,
        found = result.found,
        requests = result.requests,
        "route search finished"
    );

    Ok(Json(RouteResponse::from(result)))
}

/// Application error type.
#[derive(Debug)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::NoLandBorders => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InvalidResponse | ErrorCode::NetworkError => StatusCode::BAD_GATEWAY,
            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::UnexpectedError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        AppError {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl From<CountryError> for AppError {
    fn from(e: CountryError) -> Self {
        AppError {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(%status, code = %self.code, "{}", self.message);
        } else {
            warn!(%status, code = %self.code, "{}", self.message);
        }

        let body = Json(ErrorResponse {
            code: self.code,
            error: self.message,
        });
        (status, body).into_response()
    }
}
