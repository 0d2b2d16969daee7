use std::sync::Arc;

use crate::application::services::{StatsInvalidator, StatsService};
use crate::domain::repositories::LibraryRepository;
use crate::infrastructure::repositories::InMemoryLibraryRepository;

/// Everything that varies between production and test environments.
pub struct AppStateConfig {
    pub stats_invalidator: StatsInvalidator,
}

#[derive(Clone)]
pub struct AppState {
    pub library_repo: Arc<dyn LibraryRepository>,
    pub stats_service: StatsService,
    pub stats_invalidator: StatsInvalidator,
}

impl AppState {
    /// Build the application state around an existing repository.
    pub fn new(library_repo: Arc<dyn LibraryRepository>, config: AppStateConfig) -> Self {
        let stats_service = StatsService::new(Arc::clone(&library_repo));
        Self {
            library_repo,
            stats_service,
            stats_invalidator: config.stats_invalidator,
        }
    }

    /// Build the application state with a fresh in-memory library store.
    pub fn in_memory(config: AppStateConfig) -> Self {
        Self::new(Arc::new(InMemoryLibraryRepository::new()), config)
    }
}
