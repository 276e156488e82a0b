use scholarlink_common::AppConfig;
use scholarlink_engine::{EmbeddingStore, Recommender, ReloadStatus};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Embedding store holding the served snapshot
    pub store: Arc<EmbeddingStore>,

    /// Recommendation service over the store
    pub recommender: Recommender,

    /// Reload loop status, written by the background task
    pub reload_status: Arc<RwLock<ReloadStatus>>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: AppConfig,
        store: Arc<EmbeddingStore>,
        reload_status: Arc<RwLock<ReloadStatus>>,
    ) -> Self {
        Self {
            recommender: Recommender::new(store.clone()),
            config,
            store,
            reload_status,
        }
    }
}
