use axum::extract::State;
use axum::{Json, Router};
use axum::routing::get;
use tracing::{error, info};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sources", get(list_sources))
        .route("/categories", get(list_categories))
}

/// GET /api/sources
pub async fn list_sources(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    info!("GET /api/sources - Listing sources");
    let sources = state.store.sources().await.map_err(|e| {
        error!("Failed to list sources: {}", e);
        e
    })?;
    Ok(Json(sources))
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    info!("GET /api/categories - Listing categories");
    let categories = state.store.categories().await.map_err(|e| {
        error!("Failed to list categories: {}", e);
        e
    })?;
    Ok(Json(categories))
}
