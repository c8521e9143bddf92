use axum::extract::{Query, State};
use axum::{Json, Router};
use axum::routing::get;
use chrono::Utc;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{PeriodTotals, StatisticsResponse, SummaryQueryParams, TrendPeriod};
use crate::services::statistics_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_statistics))
        .route("/summary", get(get_period_summary))
}

/// GET /api/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
) -> Result<Json<StatisticsResponse>, AppError> {
    info!("GET /api/statistics - Computing statistics");
    let stats = statistics_service::get_statistics(state.store.as_ref(), Utc::now())
        .await
        .map_err(|e| {
            error!("Failed to compute statistics: {}", e);
            e
        })?;
    Ok(Json(stats))
}

/// GET /api/statistics/summary?period=24h|7d|14d (default 7d)
pub async fn get_period_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryQueryParams>,
) -> Result<Json<PeriodTotals>, AppError> {
    let period = match params.period.as_deref() {
        Some(raw) => raw.parse::<TrendPeriod>().map_err(AppError::Validation)?,
        None => TrendPeriod::default(),
    };
    info!("GET /api/statistics/summary - Totals for {}", period.as_str());

    let totals = statistics_service::get_period_summary(state.store.as_ref(), period, Utc::now())
        .await
        .map_err(|e| {
            error!("Failed to compute {} summary: {}", period.as_str(), e);
            e
        })?;
    Ok(Json(totals))
}
