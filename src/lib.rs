pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod store;
pub mod validate;

use std::sync::Arc;

use crate::config::Config;
use crate::repository::Repository;

/// Shared application state. Cloned per-connection by axum; cheap because
/// the repository just wraps a pooled `SqlitePool` and the config is
/// behind an `Arc`. No caches live here by design — the store is the only
/// source of truth a handler ever consults.
#[derive(Clone)]
pub struct AppState {
    pub repository: Repository,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repository: Repository, config: Config) -> Self {
        AppState {
            repository,
            config: Arc::new(config),
        }
    }
}
