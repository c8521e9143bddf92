use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::SentimentLabel;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 500;

// A scraped news article. `url` is unique across the corpus; `source` is the store's partition key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub category: String,
    pub content: String,
    pub published_date: DateTime<Utc>,
    pub scraped_date: DateTime<Utc>,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub sentiment_confidence: f64,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
}

impl Article {
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::normalize(Some(&self.sentiment_label))
    }
}

/// Incoming article, as posted by the scraper or a client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticle {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    pub source: String,
    pub category: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub content: Option<String>,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
    pub sentiment_confidence: Option<f64>,
    pub positive_words: Option<Vec<String>>,
    pub negative_words: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
    pub sentiment_confidence: Option<f64>,
}

impl UpdateArticle {
    pub fn has_sentiment(&self) -> bool {
        self.sentiment_label.is_some()
            || self.sentiment_score.is_some()
            || self.sentiment_confidence.is_some()
    }
}

/// Filters for listing articles
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArticleQuery {
    pub source: Option<String>,
    pub category: Option<String>,
    pub sentiment: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ArticleQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn sentiment_label(&self) -> Option<SentimentLabel> {
        self.sentiment
            .as_deref()
            .map(|s| SentimentLabel::normalize(Some(s)))
    }

    /// Lower-cased, trimmed search term; blank searches are ignored
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }

    /// `LIKE` pattern for the search term with `\`, `%` and `_` escaped, so the term
    /// matches literally under `ESCAPE '\'`
    pub fn search_pattern(&self) -> Option<String> {
        self.search_term().map(|term| {
            let escaped = term
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{}%", escaped)
        })
    }

    pub fn matches(&self, article: &Article) -> bool {
        if let Some(source) = &self.source {
            if &article.source != source {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !article.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(label) = self.sentiment_label() {
            if article.label() != label {
                return false;
            }
        }
        if let Some(term) = self.search_term() {
            if !article.title.to_lowercase().contains(&term)
                && !article.description.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        true
    }
}

/// Outcome of a batch import
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchImportResult {
    pub added: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReanalysisSummary {
    pub examined: usize,
    pub updated: usize,
}
