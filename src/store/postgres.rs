use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::debug;

use crate::db::article_queries;
use crate::errors::AppError;
use crate::models::{Article, ArticleQuery, SentimentCounts, SentimentLabel, TrendPoint};
use crate::store::ArticleStore;

pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates or upgrades the articles schema
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Store(format!("Schema migration failed: {}", e)))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn insert(&self, article: &Article) -> Result<(), AppError> {
        article_queries::insert(&self.pool, article).await.map_err(|e| {
            if is_unique_violation(&e) {
                debug!("Duplicate article url {}", article.url);
                AppError::Conflict(format!("Article with url {} already exists", article.url))
            } else {
                AppError::Db(e)
            }
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Article>, AppError> {
        Ok(article_queries::fetch_one(&self.pool, id).await?)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Article>, AppError> {
        Ok(article_queries::fetch_by_url(&self.pool, url).await?)
    }

    async fn list(&self, query: &ArticleQuery) -> Result<Vec<Article>, AppError> {
        Ok(article_queries::fetch_filtered(&self.pool, query).await?)
    }

    async fn all(&self) -> Result<Vec<Article>, AppError> {
        Ok(article_queries::fetch_all(&self.pool).await?)
    }

    async fn update(&self, article: &Article) -> Result<Option<Article>, AppError> {
        Ok(article_queries::update(&self.pool, article).await?)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(article_queries::delete(&self.pool, id).await? > 0)
    }

    async fn published_since(&self, since: DateTime<Utc>) -> Result<Vec<TrendPoint>, AppError> {
        Ok(article_queries::fetch_trend_points(&self.pool, since).await?)
    }

    async fn total(&self) -> Result<i64, AppError> {
        Ok(article_queries::count_all(&self.pool).await?)
    }

    async fn count_by_label(&self) -> Result<SentimentCounts, AppError> {
        let rows = article_queries::count_by_label(&self.pool).await?;
        let mut counts = SentimentCounts::default();
        for (label, count) in rows {
            counts.add(SentimentLabel::normalize(Some(&label)), count);
        }
        Ok(counts)
    }

    async fn count_by_source(&self) -> Result<BTreeMap<String, i64>, AppError> {
        Ok(article_queries::count_by_source(&self.pool).await?.into_iter().collect())
    }

    async fn count_by_category(&self) -> Result<BTreeMap<String, i64>, AppError> {
        Ok(article_queries::count_by_category(&self.pool).await?.into_iter().collect())
    }

    async fn sources(&self) -> Result<Vec<String>, AppError> {
        Ok(article_queries::distinct_sources(&self.pool).await?)
    }

    async fn categories(&self) -> Result<Vec<String>, AppError> {
        Ok(article_queries::distinct_categories(&self.pool).await?)
    }
}
