//! Full-list and autocomplete endpoints
//!
//! GET /api/occupations            - every occupation
//! GET /api/locations              - every (state, area name)
//! GET /api/search/occupations?q=  - occupation autocomplete (max 20)
//! GET /api/search/states?q=       - state autocomplete (max 20)
//! GET /api/search/counties?q=&state= - county/town autocomplete (max 20)

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::matcher::OccupationMatch;
use crate::search::{CountySuggestion, LocationEntry, Searcher, StateSuggestion};
use crate::AppState;

/// Query parameters for autocomplete
#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    /// Fragment to match
    #[serde(default)]
    pub q: String,

    /// Optional state refinement (counties only)
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OccupationList {
    pub occupations: Vec<OccupationMatch>,
}

#[derive(Debug, Serialize)]
pub struct LocationList {
    pub locations: Vec<LocationEntry>,
}

#[derive(Debug, Serialize)]
pub struct StateList {
    pub states: Vec<StateSuggestion>,
}

#[derive(Debug, Serialize)]
pub struct CountyList {
    pub counties: Vec<CountySuggestion>,
}

/// GET /api/occupations
pub async fn list_occupations(State(state): State<AppState>) -> ApiResult<Json<OccupationList>> {
    let reader = state.store.reader()?;
    let occupations = Searcher::new(&reader, state.query_timeout)
        .all_occupations()
        .await?;
    Ok(Json(OccupationList { occupations }))
}

/// GET /api/locations
pub async fn list_locations(State(state): State<AppState>) -> ApiResult<Json<LocationList>> {
    let reader = state.store.reader()?;
    let locations = Searcher::new(&reader, state.query_timeout)
        .all_locations()
        .await?;
    Ok(Json(LocationList { locations }))
}

/// GET /api/search/occupations?q=Manager
pub async fn suggest_occupations(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> ApiResult<Json<OccupationList>> {
    let reader = state.store.reader()?;
    let occupations = Searcher::new(&reader, state.query_timeout)
        .suggest_occupations(&params.q)
        .await?;
    Ok(Json(OccupationList { occupations }))
}

/// GET /api/search/states?q=Cal
pub async fn suggest_states(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> ApiResult<Json<StateList>> {
    let reader = state.store.reader()?;
    let states = Searcher::new(&reader, state.query_timeout)
        .suggest_states(&params.q)
        .await?;
    Ok(Json(StateList { states }))
}

/// GET /api/search/counties?q=Orange&state=California
pub async fn suggest_counties(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> ApiResult<Json<CountyList>> {
    let reader = state.store.reader()?;
    let counties = Searcher::new(&reader, state.query_timeout)
        .suggest_counties(&params.q, params.state.as_deref())
        .await?;
    Ok(Json(CountyList { counties }))
}

/// Build lookup routes
pub fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/api/occupations", get(list_occupations))
        .route("/api/locations", get(list_locations))
        .route("/api/search/occupations", get(suggest_occupations))
        .route("/api/search/states", get(suggest_states))
        .route("/api/search/counties", get(suggest_counties))
}
