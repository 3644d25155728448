//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CategoryStore, FileStore, PostStore};
use quill_infra::{LocalFileStore, MemoryStore, SeaCategoryStore, SeaPostStore, connect};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub files: Arc<dyn FileStore>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(&config.uploads_dir));

        let (posts, categories): (Arc<dyn PostStore>, Arc<dyn CategoryStore>) =
            match &config.database {
                Some(db_config) => match connect(db_config).await {
                    Ok(conn) => (
                        Arc::new(SeaPostStore::new(conn.clone())),
                        Arc::new(SeaCategoryStore::new(conn)),
                    ),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        memory_stores()
                    }
                },
                None => {
                    tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
                    memory_stores()
                }
            };

        tracing::info!("Application state initialized");

        Self {
            posts,
            categories,
            files,
        }
    }
}

fn memory_stores() -> (Arc<dyn PostStore>, Arc<dyn CategoryStore>) {
    let store = MemoryStore::new();
    let categories = store.categories();
    (Arc::new(store), Arc::new(categories))
}
