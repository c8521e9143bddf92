use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Article, ArticleQuery, BatchImportResult, CreateArticle, ReanalysisSummary, SentimentLabel,
    UpdateArticle, DEFAULT_CATEGORY,
};
use crate::services::sentiment_analyzer;
use crate::store::ArticleStore;

fn validate(input: &CreateArticle) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Article title cannot be empty".into()));
    }
    if input.source.trim().is_empty() {
        return Err(AppError::Validation("Article source cannot be empty".into()));
    }
    match url::Url::parse(input.url.trim()) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
        _ => {
            return Err(AppError::Validation(format!(
                "Article url must be an absolute http(s) url: {}",
                input.url
            )))
        }
    }
    validate_sentiment(input.sentiment_score, input.sentiment_confidence)
}

fn validate_sentiment(score: Option<f64>, confidence: Option<f64>) -> Result<(), AppError> {
    if let Some(score) = score {
        if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
            return Err(AppError::Validation(format!(
                "Sentiment score must be within [-1, 1], got {}",
                score
            )));
        }
    }
    if let Some(confidence) = confidence {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(AppError::Validation(format!(
                "Sentiment confidence must be within [0, 1], got {}",
                confidence
            )));
        }
    }
    Ok(())
}

/// Builds the stored article, replacing weak or unrecognized supplied sentiment with a
/// fresh analysis
fn build_article(input: CreateArticle) -> Article {
    let now = Utc::now();
    let supplied_confidence = input.sentiment_confidence.unwrap_or(0.0);
    let supplied_label = input.sentiment_label.as_deref().and_then(SentimentLabel::parse);
    if supplied_label.is_none() && input.sentiment_label.is_some() {
        debug!(
            "Ignoring unrecognized sentiment label {:?} for {}",
            input.sentiment_label, input.url
        );
    }

    let kept_label = supplied_label
        .filter(|label| !sentiment_analyzer::should_reanalyze(label.as_str(), supplied_confidence));

    let (label, score, confidence, positive_words, negative_words) = match kept_label {
        Some(label) => (
            label,
            input.sentiment_score.unwrap_or(0.0),
            supplied_confidence,
            input.positive_words.unwrap_or_default(),
            input.negative_words.unwrap_or_default(),
        ),
        None => {
            let terms = sentiment_analyzer::analyze_with_terms(&input.title);
            debug!(
                "Re-analyzed '{}' as {} ({})",
                input.title, terms.result.label, terms.result.score
            );
            (
                terms.result.label,
                terms.result.score,
                terms.result.confidence,
                terms.positive_words,
                terms.negative_words,
            )
        }
    };

    let category = input
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    Article {
        id: Uuid::new_v4().to_string(),
        title: input.title.trim().to_string(),
        description: input.description,
        url: input.url.trim().to_string(),
        source: input.source.trim().to_string(),
        category,
        content: input.content.unwrap_or_default(),
        published_date: input.published_date.unwrap_or(now),
        scraped_date: now,
        sentiment_label: label.as_str().to_string(),
        sentiment_score: score,
        sentiment_confidence: confidence,
        positive_words,
        negative_words,
    }
}

pub async fn create(store: &dyn ArticleStore, input: CreateArticle) -> Result<Article, AppError> {
    validate(&input)?;
    let article = build_article(input);
    store.insert(&article).await?;
    Ok(article)
}

/// Known urls are skipped before validation and scoring. The insert still rejects a url
/// claimed concurrently.
async fn import_one(store: &dyn ArticleStore, input: CreateArticle) -> Result<Article, AppError> {
    if let Some(existing) = store.find_by_url(input.url.trim()).await? {
        debug!("Skipping {}: already stored as {}", input.url, existing.id);
        return Err(AppError::Conflict(format!(
            "Article with url {} already exists",
            existing.url
        )));
    }
    create(store, input).await
}

/// Imports articles independently: duplicates are skipped, failures are reported per url
pub async fn create_batch(
    store: &dyn ArticleStore,
    inputs: Vec<CreateArticle>,
    concurrency: usize,
) -> Result<BatchImportResult, AppError> {
    let outcomes: Vec<(String, Result<Article, AppError>)> = stream::iter(inputs)
        .map(|input| async move {
            let url = input.url.clone();
            (url, import_one(store, input).await)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut result = BatchImportResult::default();
    for (url, outcome) in outcomes {
        match outcome {
            Ok(_) => result.added += 1,
            Err(AppError::Conflict(_)) => result.skipped += 1,
            Err(e) => {
                warn!("Batch import failed for {}: {}", url, e);
                result.errors.push(format!("{}: {}", url, e));
            }
        }
    }

    info!(
        "Batch import finished: {} added, {} skipped, {} errors",
        result.added,
        result.skipped,
        result.errors.len()
    );
    Ok(result)
}

pub async fn fetch_one(store: &dyn ArticleStore, id: &str) -> Result<Article, AppError> {
    store.get(id).await?.ok_or(AppError::NotFound)
}

pub async fn list(store: &dyn ArticleStore, query: &ArticleQuery) -> Result<Vec<Article>, AppError> {
    store.list(query).await
}

pub async fn update(
    store: &dyn ArticleStore,
    id: &str,
    input: UpdateArticle,
) -> Result<Article, AppError> {
    validate_sentiment(input.sentiment_score, input.sentiment_confidence)?;
    let label = match input.sentiment_label.as_deref() {
        Some(raw) => Some(SentimentLabel::parse(raw).ok_or_else(|| {
            AppError::Validation(format!(
                "Sentiment label must be positive, neutral or negative, got '{}'",
                raw
            ))
        })?),
        None => None,
    };
    let mut article = fetch_one(store, id).await?;

    let mut title_changed = false;
    if let Some(title) = input.title.as_deref() {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Article title cannot be empty".into()));
        }
        title_changed = title != article.title;
        article.title = title.to_string();
    }
    if let Some(description) = input.description.clone() {
        article.description = description;
    }
    if let Some(category) = input.category.clone() {
        article.category = category;
    }
    if let Some(content) = input.content.clone() {
        article.content = content;
    }

    if input.has_sentiment() {
        if let Some(label) = label {
            article.sentiment_label = label.as_str().to_string();
        }
        if let Some(score) = input.sentiment_score {
            article.sentiment_score = score;
        }
        if let Some(confidence) = input.sentiment_confidence {
            article.sentiment_confidence = confidence;
        }
    } else if title_changed {
        apply_analysis(&mut article);
    }

    store.update(&article).await?.ok_or(AppError::NotFound)
}

pub async fn delete(store: &dyn ArticleStore, id: &str) -> Result<(), AppError> {
    if store.delete(id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

/// Re-scores every stored article whose sentiment is blank, neutral, or low-confidence
pub async fn reanalyze_all(store: &dyn ArticleStore) -> Result<ReanalysisSummary, AppError> {
    let articles = store.all().await?;
    let mut summary = ReanalysisSummary {
        examined: articles.len(),
        updated: 0,
    };

    for mut article in articles {
        if !sentiment_analyzer::should_reanalyze(
            &article.sentiment_label,
            article.sentiment_confidence,
        ) {
            continue;
        }
        let before = (
            article.sentiment_label.clone(),
            article.sentiment_score,
            article.sentiment_confidence,
        );
        apply_analysis(&mut article);
        if before
            != (
                article.sentiment_label.clone(),
                article.sentiment_score,
                article.sentiment_confidence,
            )
            && store.update(&article).await?.is_some()
        {
            summary.updated += 1;
        }
    }

    info!(
        "Reanalysis examined {} articles, updated {}",
        summary.examined, summary.updated
    );
    Ok(summary)
}

fn apply_analysis(article: &mut Article) {
    let terms = sentiment_analyzer::analyze_with_terms(&article.title);
    article.sentiment_label = terms.result.label.to_string();
    article.sentiment_score = terms.result.score;
    article.sentiment_confidence = terms.result.confidence;
    article.positive_words = terms.positive_words;
    article.negative_words = terms.negative_words;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryArticleStore;

    fn input(title: &str, url: &str) -> CreateArticle {
        CreateArticle {
            title: title.to_string(),
            url: url.to_string(),
            source: "RNZ".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_fills_defaults_and_analyzes() {
        let store = InMemoryArticleStore::new();
        let article = create(&store, input("Company reports record growth", "https://rnz.co.nz/a"))
            .await
            .unwrap();

        assert_eq!(article.category, DEFAULT_CATEGORY);
        assert_eq!(article.sentiment_label, "positive");
        assert!(article.positive_words.contains(&"growth".to_string()));
        assert!(Uuid::parse_str(&article.id).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_confident_supplied_sentiment_is_kept() {
        let store = InMemoryArticleStore::new();
        let article = create(
            &store,
            CreateArticle {
                sentiment_label: Some("negative".to_string()),
                sentiment_score: Some(-0.6),
                sentiment_confidence: Some(0.8),
                ..input("Company reports record growth", "https://rnz.co.nz/b")
            },
        )
        .await
        .unwrap();

        assert_eq!(article.sentiment_label, "negative");
        assert_eq!(article.sentiment_score, -0.6);
    }

    #[tokio::test]
    async fn test_weak_supplied_sentiment_is_replaced() {
        let store = InMemoryArticleStore::new();
        let article = create(
            &store,
            CreateArticle {
                sentiment_label: Some("negative".to_string()),
                sentiment_score: Some(-0.1),
                sentiment_confidence: Some(0.1),
                ..input("Company reports record growth", "https://rnz.co.nz/c")
            },
        )
        .await
        .unwrap();

        assert_eq!(article.sentiment_label, "positive");
    }

    #[tokio::test]
    async fn test_unknown_supplied_label_is_reanalyzed() {
        let store = InMemoryArticleStore::new();
        let article = create(
            &store,
            CreateArticle {
                sentiment_label: Some("mixed".to_string()),
                sentiment_score: Some(0.9),
                sentiment_confidence: Some(0.9),
                ..input("Company reports record growth", "https://rnz.co.nz/mixed")
            },
        )
        .await
        .unwrap();

        let expected = sentiment_analyzer::analyze("Company reports record growth");
        assert_eq!(article.sentiment_label, "positive");
        assert_eq!(article.sentiment_score, expected.score);
        assert_eq!(article.sentiment_confidence, expected.confidence);
    }

    #[tokio::test]
    async fn test_supplied_label_is_stored_lowercase() {
        let store = InMemoryArticleStore::new();
        let article = create(
            &store,
            CreateArticle {
                sentiment_label: Some(" POSITIVE ".to_string()),
                sentiment_confidence: Some(0.8),
                ..input("Markets open Monday", "https://rnz.co.nz/upper")
            },
        )
        .await
        .unwrap();

        assert_eq!(article.sentiment_label, "positive");
        let stored = fetch_one(&store, &article.id).await.unwrap();
        assert_eq!(stored.sentiment_label, "positive");
    }

    #[tokio::test]
    async fn test_update_normalizes_or_rejects_label() {
        let store = InMemoryArticleStore::new();
        let article = create(&store, input("Markets open Monday", "https://rnz.co.nz/label")).await.unwrap();

        let rejected = update(
            &store,
            &article.id,
            UpdateArticle {
                sentiment_label: Some("mixed".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(rejected, Err(AppError::Validation(_))));
        assert_eq!(fetch_one(&store, &article.id).await.unwrap().sentiment_label, "neutral");

        let updated = update(
            &store,
            &article.id,
            UpdateArticle {
                sentiment_label: Some("NEGATIVE".to_string()),
                sentiment_score: Some(-0.5),
                sentiment_confidence: Some(0.7),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.sentiment_label, "negative");
        assert_eq!(updated.sentiment_score, -0.5);
    }

    #[tokio::test]
    async fn test_batch_skips_known_url_without_touching_it() {
        let store = InMemoryArticleStore::new();
        let existing = create(&store, input("Markets open Monday", "https://rnz.co.nz/known")).await.unwrap();

        let result = create_batch(
            &store,
            vec![input("Company faces fraud investigation", " https://rnz.co.nz/known ")],
            2,
        )
        .await
        .unwrap();

        assert_eq!(result.skipped, 1);
        assert_eq!(result.added, 0);
        let kept = fetch_one(&store, &existing.id).await.unwrap();
        assert_eq!(kept.title, "Markets open Monday");
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let store = InMemoryArticleStore::new();
        for bad in [
            input("  ", "https://rnz.co.nz/x"),
            input("Title", "not a url"),
            input("Title", "ftp://rnz.co.nz/x"),
            CreateArticle { source: String::new(), ..input("Title", "https://rnz.co.nz/x") },
            CreateArticle { sentiment_score: Some(1.5), ..input("Title", "https://rnz.co.nz/x") },
            CreateArticle { sentiment_confidence: Some(f64::NAN), ..input("Title", "https://rnz.co.nz/x") },
        ] {
            assert!(matches!(create(&store, bad).await, Err(AppError::Validation(_))));
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_batch_counts_duplicates_and_errors() {
        let store = InMemoryArticleStore::new();
        create(&store, input("Existing story", "https://rnz.co.nz/1")).await.unwrap();

        let result = create_batch(
            &store,
            vec![
                input("Existing story again", "https://rnz.co.nz/1"),
                input("Fresh story", "https://rnz.co.nz/2"),
                input("Fresh story copy", "https://rnz.co.nz/2"),
                input("", "https://rnz.co.nz/3"),
                input("Another story", "https://rnz.co.nz/4"),
            ],
            4,
        )
        .await
        .unwrap();

        assert_eq!(result.added, 2);
        assert_eq!(result.skipped, 2);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("https://rnz.co.nz/3: "));
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_update_recomputes_sentiment_on_title_change() {
        let store = InMemoryArticleStore::new();
        let article = create(&store, input("Markets open Monday", "https://rnz.co.nz/u")).await.unwrap();
        assert_eq!(article.sentiment_label, "neutral");

        let updated = update(
            &store,
            &article.id,
            UpdateArticle {
                title: Some("Company faces fraud investigation".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.sentiment_label, "negative");
        assert_eq!(updated.url, article.url);

        let missing = update(&store, "nope", UpdateArticle::default()).await;
        assert!(matches!(missing, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = InMemoryArticleStore::new();
        let article = create(&store, input("Story", "https://rnz.co.nz/d")).await.unwrap();
        delete(&store, &article.id).await.unwrap();
        assert!(matches!(delete(&store, &article.id).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_reanalyze_all_only_touches_weak_sentiment() {
        let store = InMemoryArticleStore::new();
        let confident = create(
            &store,
            CreateArticle {
                sentiment_label: Some("negative".to_string()),
                sentiment_score: Some(-0.7),
                sentiment_confidence: Some(0.9),
                ..input("Company reports record growth", "https://rnz.co.nz/r1")
            },
        )
        .await
        .unwrap();

        let mut stale = create(&store, input("Placeholder", "https://rnz.co.nz/r2")).await.unwrap();
        stale.title = "Company faces fraud investigation".to_string();
        store.update(&stale).await.unwrap();

        let summary = reanalyze_all(&store).await.unwrap();
        assert_eq!(summary.examined, 2);
        assert_eq!(summary.updated, 1);

        assert_eq!(fetch_one(&store, &confident.id).await.unwrap().sentiment_label, "negative");
        assert_eq!(fetch_one(&store, &stale.id).await.unwrap().sentiment_label, "negative");
    }
}
