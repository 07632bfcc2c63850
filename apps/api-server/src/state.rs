//! Application state - shared across all handlers.

use std::sync::Arc;

use chronicle_core::StoreError;
use chronicle_core::ports::{PostStore, UserStore};
use chronicle_infra::{FilePostStore, FileUserStore};

use crate::config::AppConfig;

/// Shared application state. The store behind each handle is the only owner
/// of the canonical collections.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Build the state with the backend the configuration selects: the
    /// database when one is configured and reachable, flat files otherwise.
    pub async fn new(config: &AppConfig) -> Result<Self, StoreError> {
        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            match chronicle_infra::store::connect(db_config).await {
                Ok(conn) => {
                    return Ok(Self {
                        posts: Arc::new(chronicle_infra::PostgresPostStore::new(conn.clone())),
                        users: Arc::new(chronicle_infra::PostgresUserStore::new(conn)),
                    });
                }
                Err(e) => {
                    tracing::error!(
                        "failed to connect to database: {e}. Falling back to the file store."
                    );
                }
            }
        }

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!(
                "DATABASE_URL is set but the postgres feature is not compiled; using the file store"
            );
        }

        let posts = FilePostStore::open(config.data_dir.join("posts.json"))?;
        let users = FileUserStore::open(config.data_dir.join("users.json"))?;
        tracing::info!(data_dir = %config.data_dir.display(), "file-backed store initialized");

        Ok(Self {
            posts: Arc::new(posts),
            users: Arc::new(users),
        })
    }
}
