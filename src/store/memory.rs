use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{Article, ArticleQuery, SentimentCounts, TrendPoint};
use crate::store::ArticleStore;

/// Process-local article store for development and tests
#[derive(Clone, Default)]
pub struct InMemoryArticleStore {
    articles: Arc<DashMap<String, Article>>,
    /// url -> id
    urls: Arc<DashMap<String, String>>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    fn snapshot(&self) -> Vec<Article> {
        self.articles.iter().map(|entry| entry.value().clone()).collect()
    }

    fn count_by<F>(&self, key: F) -> BTreeMap<String, i64>
    where
        F: Fn(&Article) -> &str,
    {
        let mut counts = BTreeMap::new();
        for entry in self.articles.iter() {
            *counts.entry(key(entry.value()).to_string()).or_insert(0) += 1;
        }
        counts
    }
}

fn newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        b.published_date
            .cmp(&a.published_date)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn insert(&self, article: &Article) -> Result<(), AppError> {
        // The url entry stays locked until the article is in place
        match self.urls.entry(article.url.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Article with url {} already exists",
                article.url
            ))),
            Entry::Vacant(slot) => {
                self.articles.insert(article.id.clone(), article.clone());
                slot.insert(article.id.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Article>, AppError> {
        Ok(self.articles.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Article>, AppError> {
        let id = match self.urls.get(url) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };
        self.get(&id).await
    }

    async fn list(&self, query: &ArticleQuery) -> Result<Vec<Article>, AppError> {
        let mut matching: Vec<Article> = self
            .snapshot()
            .into_iter()
            .filter(|article| query.matches(article))
            .collect();
        newest_first(&mut matching);

        Ok(matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect())
    }

    async fn all(&self) -> Result<Vec<Article>, AppError> {
        let mut articles = self.snapshot();
        newest_first(&mut articles);
        Ok(articles)
    }

    async fn update(&self, article: &Article) -> Result<Option<Article>, AppError> {
        match self.articles.get_mut(&article.id) {
            Some(mut entry) => {
                let url = entry.url.clone();
                *entry = Article {
                    url,
                    ..article.clone()
                };
                Ok(Some(entry.value().clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        match self.articles.remove(id) {
            Some((_, article)) => {
                self.urls.remove(&article.url);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn published_since(&self, since: DateTime<Utc>) -> Result<Vec<TrendPoint>, AppError> {
        Ok(self
            .articles
            .iter()
            .filter(|entry| entry.published_date >= since)
            .map(|entry| TrendPoint::from(entry.value()))
            .collect())
    }

    async fn total(&self) -> Result<i64, AppError> {
        Ok(self.articles.len() as i64)
    }

    async fn count_by_label(&self) -> Result<SentimentCounts, AppError> {
        let mut counts = SentimentCounts::default();
        for entry in self.articles.iter() {
            counts.record(entry.label());
        }
        Ok(counts)
    }

    async fn count_by_source(&self) -> Result<BTreeMap<String, i64>, AppError> {
        Ok(self.count_by(|article| article.source.as_str()))
    }

    async fn count_by_category(&self) -> Result<BTreeMap<String, i64>, AppError> {
        Ok(self.count_by(|article| article.category.as_str()))
    }

    async fn sources(&self) -> Result<Vec<String>, AppError> {
        Ok(self.count_by(|article| article.source.as_str()).into_keys().collect())
    }

    async fn categories(&self) -> Result<Vec<String>, AppError> {
        Ok(self.count_by(|article| article.category.as_str()).into_keys().collect())
    }
}
