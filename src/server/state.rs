//! Application state shared across handlers.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::library::Catalog;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Chapter catalog.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Create application state for a catalog.
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }

    /// Run a catalog query on the blocking pool.
    ///
    /// First access to an item may scan directories or decompress an archive.
    pub async fn with_catalog<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Catalog) -> Result<T> + Send + 'static,
    {
        let catalog = Arc::clone(&self.catalog);
        tokio::task::spawn_blocking(move || f(&*catalog))
            .await
            .map_err(|e| AppError::Internal(format!("Catalog task failed: {}", e)))?
    }
}
