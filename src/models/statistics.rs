use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

use crate::models::SentimentCounts;

/// The two fields the trend aggregator needs from an article
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub published_date: DateTime<Utc>,
    pub sentiment_label: Option<String>,
}

/// One fixed-width accumulator of sentiment counts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    pub period_start: DateTime<Utc>,
    pub label: String,
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentTrends {
    pub last24_hours: Vec<TrendBucket>,
    pub last7_days: Vec<TrendBucket>,
    pub last14_days: Vec<TrendBucket>,
}

/// Window selected in the summary panel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TrendPeriod {
    #[serde(rename = "24h")]
    Last24Hours,
    #[default]
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "14d")]
    Last14Days,
}

impl TrendPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendPeriod::Last24Hours => "24h",
            TrendPeriod::Last7Days => "7d",
            TrendPeriod::Last14Days => "14d",
        }
    }
}

impl std::str::FromStr for TrendPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "24h" => Ok(TrendPeriod::Last24Hours),
            "7d" => Ok(TrendPeriod::Last7Days),
            "14d" => Ok(TrendPeriod::Last14Days),
            other => Err(format!("Unknown period '{}'. Expected 24h, 7d or 14d", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub period: TrendPeriod,
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryQueryParams {
    pub period: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub total_articles: i64,
    pub by_sentiment: SentimentCounts,
    pub by_source: BTreeMap<String, i64>,
    pub by_category: BTreeMap<String, i64>,
    pub trends: SentimentTrends,
    pub generated_at: DateTime<Utc>,
}
