use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::AppError;
use crate::models::{PeriodTotals, StatisticsResponse, TrendPeriod};
use crate::services::trend_aggregator::{self, TrendWindows};
use crate::store::ArticleStore;

/// Corpus-wide counts plus the three trend series, computed fresh on every call
pub async fn get_statistics(
    store: &dyn ArticleStore,
    now: DateTime<Utc>,
) -> Result<StatisticsResponse, AppError> {
    let windows = TrendWindows::at(now);
    let points = store.published_since(windows.earliest()).await?;
    debug!("Building trends from {} recent articles", points.len());

    Ok(StatisticsResponse {
        total_articles: store.total().await?,
        by_sentiment: store.count_by_label().await?,
        by_source: store.count_by_source().await?,
        by_category: store.count_by_category().await?,
        trends: trend_aggregator::build_trends(&points, now),
        generated_at: now,
    })
}

pub async fn get_period_summary(
    store: &dyn ArticleStore,
    period: TrendPeriod,
    now: DateTime<Utc>,
) -> Result<PeriodTotals, AppError> {
    let windows = TrendWindows::at(now);
    let points = store.published_since(windows.earliest()).await?;
    let trends = trend_aggregator::build_trends(&points, now);
    let corpus = store.count_by_label().await?;
    Ok(trend_aggregator::period_totals(&trends, period, &corpus))
}
