use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::RepositoryError;
use crate::domain::books::BookRecord;
use crate::domain::ids::LibraryId;
use crate::domain::preferences::ReadingPreferences;

/// Point-in-time view of a stored library. `revision` increases with every
/// write to either the books or the preferences, so two snapshots with the
/// same revision hold the same inputs.
#[derive(Debug, Clone)]
pub struct LibrarySnapshot {
    pub library_id: LibraryId,
    pub books: Arc<Vec<BookRecord>>,
    pub preferences: ReadingPreferences,
    pub revision: u64,
}

/// Acknowledgement returned after a library write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySummary {
    pub library_id: LibraryId,
    pub revision: u64,
    pub books: usize,
}

impl From<&LibrarySnapshot> for LibrarySummary {
    fn from(snapshot: &LibrarySnapshot) -> Self {
        Self {
            library_id: snapshot.library_id.clone(),
            revision: snapshot.revision,
            books: snapshot.books.len(),
        }
    }
}

#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Replace the book list, creating the library with default preferences
    /// if it does not exist yet.
    async fn replace_books(
        &self,
        id: &LibraryId,
        books: Vec<BookRecord>,
    ) -> Result<LibrarySnapshot, RepositoryError>;

    /// Replace the preferences, creating an empty library if needed.
    async fn set_preferences(
        &self,
        id: &LibraryId,
        preferences: ReadingPreferences,
    ) -> Result<LibrarySnapshot, RepositoryError>;

    async fn get(&self, id: &LibraryId) -> Result<LibrarySnapshot, RepositoryError>;

    async fn delete(&self, id: &LibraryId) -> Result<(), RepositoryError>;

    async fn list_ids(&self) -> Result<Vec<LibraryId>, RepositoryError>;
}
