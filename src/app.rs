use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{articles, catalog, health, sentiment, statistics};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/articles", articles::router())
        .nest("/api/sentiment", sentiment::router())
        .nest("/api/statistics", statistics::router())
        .nest("/api", catalog::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
