use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use newsagg_backend::app;
use newsagg_backend::config::{AppConfig, StoreBackend};
use newsagg_backend::logging::{init_logging, LoggingConfig};
use newsagg_backend::state::AppState;
use newsagg_backend::store::{ArticleStore, InMemoryArticleStore, PgArticleStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env()?)?;

    let config = AppConfig::from_env()?;

    let store: Arc<dyn ArticleStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .clone()
                .ok_or("DATABASE_URL is required when STORE_BACKEND is postgres")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&database_url)
                .await?;

            let store = PgArticleStore::new(pool);
            store.migrate().await?;
            tracing::info!("Using Postgres article store");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory article store; articles are lost on restart");
            Arc::new(InMemoryArticleStore::new())
        }
    };

    let addr = config.bind_addr;
    let state = AppState { store, config };
    let app = app::create_app(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Newsagg backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
