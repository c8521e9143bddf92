use axum::{Json, Router};
use axum::routing::post;
use tracing::info;

use crate::errors::AppError;
use crate::models::{AnalyzeRequest, SentimentTerms};
use crate::services::sentiment_analyzer;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze_title))
}

/// POST /api/sentiment/analyze
/// Scores a title without storing anything
pub async fn analyze_title(
    Json(data): Json<AnalyzeRequest>,
) -> Result<Json<SentimentTerms>, AppError> {
    info!("POST /api/sentiment/analyze - Scoring title ({} chars)", data.title.len());
    Ok(Json(sentiment_analyzer::analyze_with_terms(&data.title)))
}
