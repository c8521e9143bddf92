use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{Article, ArticleQuery, TrendPoint};

const ARTICLE_COLUMNS: &str = "id, title, description, url, source, category, content, \
    published_date, scraped_date, sentiment_label, sentiment_score, sentiment_confidence, \
    positive_words, negative_words";

pub async fn insert(pool: &PgPool, article: &Article) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO articles (
            id, title, description, url, source, category, content,
            published_date, scraped_date, sentiment_label, sentiment_score,
            sentiment_confidence, positive_words, negative_words
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(&article.id)
    .bind(&article.title)
    .bind(&article.description)
    .bind(&article.url)
    .bind(&article.source)
    .bind(&article.category)
    .bind(&article.content)
    .bind(article.published_date)
    .bind(article.scraped_date)
    .bind(&article.sentiment_label)
    .bind(article.sentiment_score)
    .bind(article.sentiment_confidence)
    .bind(&article.positive_words)
    .bind(&article.negative_words)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_one(pool: &PgPool, id: &str) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(&format!("SELECT {} FROM articles WHERE id = $1", ARTICLE_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_by_url(pool: &PgPool, url: &str) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(&format!("SELECT {} FROM articles WHERE url = $1", ARTICLE_COLUMNS))
        .bind(url)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(&format!(
        "SELECT {} FROM articles ORDER BY published_date DESC",
        ARTICLE_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn fetch_filtered(pool: &PgPool, query: &ArticleQuery) -> Result<Vec<Article>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM articles WHERE TRUE", ARTICLE_COLUMNS));

    if let Some(source) = &query.source {
        builder.push(" AND source = ");
        builder.push_bind(source.clone());
    }

    if let Some(category) = &query.category {
        builder.push(" AND LOWER(category) = LOWER(");
        builder.push_bind(category.clone());
        builder.push(")");
    }

    // Unrecognized stored labels count as neutral, mirroring SentimentLabel::normalize
    if let Some(label) = query.sentiment_label() {
        builder.push(" AND (CASE WHEN LOWER(TRIM(sentiment_label)) IN ('positive', 'negative') \
            THEN LOWER(TRIM(sentiment_label)) ELSE 'neutral' END) = ");
        builder.push_bind(label.as_str());
    }

    if let Some(pattern) = query.search_pattern() {
        builder.push(" AND (LOWER(title) LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR LOWER(description) LIKE ");
        builder.push_bind(pattern);
        builder.push(" ESCAPE '\\')");
    }

    builder.push(" ORDER BY published_date DESC, id ASC LIMIT ");
    builder.push_bind(query.limit());
    builder.push(" OFFSET ");
    builder.push_bind(query.offset());

    builder.build_query_as::<Article>().fetch_all(pool).await
}

pub async fn update(pool: &PgPool, article: &Article) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(&format!(
        r#"
        UPDATE articles
        SET title = $2, description = $3, category = $4, content = $5,
            sentiment_label = $6, sentiment_score = $7, sentiment_confidence = $8,
            positive_words = $9, negative_words = $10
        WHERE id = $1
        RETURNING {}
        "#,
        ARTICLE_COLUMNS
    ))
    .bind(&article.id)
    .bind(&article.title)
    .bind(&article.description)
    .bind(&article.category)
    .bind(&article.content)
    .bind(&article.sentiment_label)
    .bind(article.sentiment_score)
    .bind(article.sentiment_confidence)
    .bind(&article.positive_words)
    .bind(&article.negative_words)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn fetch_trend_points(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<TrendPoint>, sqlx::Error> {
    sqlx::query_as::<_, TrendPoint>(
        r#"
        SELECT published_date, sentiment_label
        FROM articles
        WHERE published_date >= $1
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await
}

pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await
}

/// Raw per-label counts; labels are lower-cased and trimmed but not yet normalized
pub async fn count_by_label(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT LOWER(TRIM(sentiment_label)) AS label, COUNT(*) AS count
        FROM articles
        GROUP BY 1
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn count_by_source(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT source, COUNT(*) FROM articles GROUP BY source ORDER BY source",
    )
    .fetch_all(pool)
    .await
}

pub async fn count_by_category(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT category, COUNT(*) FROM articles GROUP BY category ORDER BY category",
    )
    .fetch_all(pool)
    .await
}

pub async fn distinct_sources(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT source FROM articles ORDER BY source")
        .fetch_all(pool)
        .await
}

pub async fn distinct_categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM articles ORDER BY category")
        .fetch_all(pool)
        .await
}
