use axum::extract::{Path, Query, State};
use axum::{Json, Router};
use axum::routing::{get, post};
use http::StatusCode;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{
    Article, ArticleQuery, BatchImportResult, CreateArticle, ReanalysisSummary, UpdateArticle,
};
use crate::services::article_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_articles).post(create_article))
        .route("/batch", post(create_articles_batch))
        .route("/reanalyze", post(reanalyze_articles))
        .route("/:id", get(get_article).put(update_article).delete(delete_article))
}

pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> Result<Json<Vec<Article>>, AppError> {
    info!("GET /api/articles - Listing articles ({:?})", query);
    let articles = article_service::list(state.store.as_ref(), &query)
        .await
        .map_err(|e| {
            error!("Failed to list articles: {}", e);
            e
        })?;
    Ok(Json(articles))
}

pub async fn create_article(
    State(state): State<AppState>,
    Json(data): Json<CreateArticle>,
) -> Result<(StatusCode, Json<Article>), AppError> {
    info!("POST /api/articles - Creating article {}", data.url);
    let article = article_service::create(state.store.as_ref(), data)
        .await
        .map_err(|e| {
            error!("Failed to create article: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn create_articles_batch(
    State(state): State<AppState>,
    Json(data): Json<Vec<CreateArticle>>,
) -> Result<Json<BatchImportResult>, AppError> {
    info!("POST /api/articles/batch - Importing {} articles", data.len());
    if data.len() > state.config.max_batch_size {
        return Err(AppError::Validation(format!(
            "Batch of {} articles exceeds the limit of {}",
            data.len(),
            state.config.max_batch_size
        )));
    }

    let result = article_service::create_batch(
        state.store.as_ref(),
        data,
        state.config.batch_concurrency,
    )
    .await
    .map_err(|e| {
        error!("Failed to import article batch: {}", e);
        e
    })?;
    Ok(Json(result))
}

pub async fn reanalyze_articles(
    State(state): State<AppState>,
) -> Result<Json<ReanalysisSummary>, AppError> {
    info!("POST /api/articles/reanalyze - Re-scoring weak sentiment");
    let summary = article_service::reanalyze_all(state.store.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to reanalyze articles: {}", e);
            e
        })?;
    Ok(Json(summary))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    info!("GET /api/articles/{} - Fetching article", id);
    let article = article_service::fetch_one(state.store.as_ref(), &id)
        .await
        .map_err(|e| {
            error!("Failed to fetch article {}: {}", id, e);
            e
        })?;
    Ok(Json(article))
}

pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateArticle>,
) -> Result<Json<Article>, AppError> {
    info!("PUT /api/articles/{} - Updating article", id);
    let article = article_service::update(state.store.as_ref(), &id, data)
        .await
        .map_err(|e| {
            error!("Failed to update article {}: {}", id, e);
            e
        })?;
    Ok(Json(article))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/articles/{} - Deleting article", id);
    match article_service::delete(state.store.as_ref(), &id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(AppError::NotFound) => {
            error!("Article {} not found for deletion", id);
            Err(AppError::NotFound)
        }
        Err(e) => {
            error!("Failed to delete article {}: {}", id, e);
            Err(e)
        }
    }
}
