//! Store maintenance endpoints
//!
//! POST /api/init-db - delete and rebuild the reference store from the CSV sources
//! GET  /api/status  - store diagnostics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use oflc_common::db::TableCounts;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::ApiResult;
use crate::store::StoreStatus;
use crate::AppState;

/// Successful rebuild response
#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub success: bool,
    pub message: String,
    pub data_counts: TableCounts,
}

/// POST /api/init-db
///
/// **Response:** `{"success": true, "message": "...", "data_counts": {"wage_data": N, "geography": N, "occupations": N}}`
///
/// **Errors:**
/// - 500: `{"success": false, "error": "..."}` (missing sources, unreadable CSV, store fault);
///   the store is left uninitialized unless the sources were missing
pub async fn init_db(State(state): State<AppState>) -> Response {
    info!("Reference store rebuild requested");

    match state.store.rebuild(&state.sources).await {
        Ok(counts) => Json(InitResponse {
            success: true,
            message: "Reference store rebuilt successfully".to_string(),
            data_counts: counts,
        })
        .into_response(),
        Err(e) => {
            error!("Rebuild request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/status
pub async fn store_status(State(state): State<AppState>) -> ApiResult<Json<StoreStatus>> {
    Ok(Json(state.store.status().await?))
}

/// Build maintenance routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/init-db", post(init_db))
        .route("/api/status", get(store_status))
}
