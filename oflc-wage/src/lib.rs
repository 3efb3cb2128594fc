//! oflc-wage library - prevailing wage lookup service
//!
//! Imports the OFLC wage, geography and occupation tables into a local SQLite
//! store and serves title/location/salary searches over HTTP.

use axum::Router;
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod dedup;
pub mod error;
pub mod import;
pub mod matcher;
pub mod search;
pub mod store;

pub use crate::error::{ApiError, ApiResult, NotFoundStage};
pub use crate::import::DataSources;
pub use crate::search::Searcher;
pub use crate::store::WageStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Reference store handle
    pub store: WageStore,
    /// CSV sources used by the rebuild action
    pub sources: DataSources,
    /// Upper bound on each store lookup
    pub query_timeout: Duration,
}

impl AppState {
    pub fn new(store: WageStore, sources: DataSources, query_timeout: Duration) -> Self {
        Self {
            store,
            sources,
            query_timeout,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::search_routes())
        .merge(api::lookup_routes())
        .merge(api::admin_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
