use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::ArticleStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
    pub config: AppConfig,
}
