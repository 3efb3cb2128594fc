//! Search endpoints
//!
//! POST /api/search/forward  - job title + location → wage levels
//! POST /api/search/reverse  - salary range + location → occupations
//! POST /api/search/location - job title + target level/salary → locations

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::search::{
    ForwardQuery, ForwardResult, LocationQuery, LocationResult, ReverseQuery, ReverseResult,
    Searcher,
};
use crate::AppState;

/// Successful search response
#[derive(Debug, Serialize)]
pub struct SearchResponse<T> {
    pub results: Vec<T>,
}

/// POST /api/search/forward
///
/// **Request:** `{"position": "Manager", "location": "California", "county": "Orange County"}`
///
/// **Errors:**
/// - 400: position or location empty, or the body is not readable JSON
/// - 404: no matching occupations / no matching wage data
/// - 503: store not initialized or being rebuilt
pub async fn forward_search(
    State(state): State<AppState>,
    payload: Result<Json<ForwardQuery>, JsonRejection>,
) -> ApiResult<Json<SearchResponse<ForwardResult>>> {
    let reader = state.store.reader()?;
    let Json(query) = payload?;
    let results = Searcher::new(&reader, state.query_timeout)
        .forward(&query)
        .await?;

    info!(
        "forward search {:?} in {:?}: {} result(s)",
        query.position,
        query.location,
        results.len()
    );
    Ok(Json(SearchResponse { results }))
}

/// POST /api/search/reverse
///
/// **Request:** `{"min_salary": 60000, "max_salary": 100000, "location": "California"}`
///
/// Amounts may also be sent as numeric strings (`"60000"`).
///
/// **Errors:**
/// - 400: either bound zero/missing/non-numeric, or location empty
/// - 404: no matching locations / no matching salary data
/// - 503: store not initialized or being rebuilt
pub async fn reverse_search(
    State(state): State<AppState>,
    payload: Result<Json<ReverseQuery>, JsonRejection>,
) -> ApiResult<Json<SearchResponse<ReverseResult>>> {
    let reader = state.store.reader()?;
    let Json(query) = payload?;
    let results = Searcher::new(&reader, state.query_timeout)
        .reverse(&query)
        .await?;

    info!(
        "reverse search [{}, {}] in {:?}: {} result(s)",
        query.min_salary,
        query.max_salary,
        query.location,
        results.len()
    );
    Ok(Json(SearchResponse { results }))
}

/// POST /api/search/location
///
/// **Request:** `{"position": "Marketing Manager", "target_level": 2, "target_salary": 80000}`
///
/// Results are ordered ascending by `target_level_salary`.
///
/// **Errors:**
/// - 400: position empty, level outside 1-4, or salary zero/missing/non-numeric
/// - 404: no matching occupations / no matching locations
/// - 503: store not initialized or being rebuilt
pub async fn location_search(
    State(state): State<AppState>,
    payload: Result<Json<LocationQuery>, JsonRejection>,
) -> ApiResult<Json<SearchResponse<LocationResult>>> {
    let reader = state.store.reader()?;
    let Json(query) = payload?;
    let results = Searcher::new(&reader, state.query_timeout)
        .location(&query)
        .await?;

    info!(
        "location search {:?} level {} >= {}: {} result(s)",
        query.position,
        query.target_level,
        query.target_salary,
        results.len()
    );
    Ok(Json(SearchResponse { results }))
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/api/search/forward", post(forward_search))
        .route("/api/search/reverse", post(reverse_search))
        .route("/api/search/location", post(location_search))
}
