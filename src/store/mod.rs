use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::errors::AppError;
use crate::models::{Article, ArticleQuery, SentimentCounts, TrendPoint};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryArticleStore;
pub use postgres::PgArticleStore;

/// Keyed article collection. Articles are addressed by opaque id, partitioned by source,
/// and unique by url.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Rejects an article whose url is already stored with `AppError::Conflict`.
    async fn insert(&self, article: &Article) -> Result<(), AppError>;

    async fn get(&self, id: &str) -> Result<Option<Article>, AppError>;

    async fn find_by_url(&self, url: &str) -> Result<Option<Article>, AppError>;

    /// Filtered page, newest first
    async fn list(&self, query: &ArticleQuery) -> Result<Vec<Article>, AppError>;

    async fn all(&self) -> Result<Vec<Article>, AppError>;

    /// Replaces the mutable fields of the article with the same id. The url is never changed.
    async fn update(&self, article: &Article) -> Result<Option<Article>, AppError>;

    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    async fn published_since(&self, since: DateTime<Utc>) -> Result<Vec<TrendPoint>, AppError>;

    async fn total(&self) -> Result<i64, AppError>;

    async fn count_by_label(&self) -> Result<SentimentCounts, AppError>;

    async fn count_by_source(&self) -> Result<BTreeMap<String, i64>, AppError>;

    async fn count_by_category(&self) -> Result<BTreeMap<String, i64>, AppError>;

    async fn sources(&self) -> Result<Vec<String>, AppError>;

    async fn categories(&self) -> Result<Vec<String>, AppError>;
}
