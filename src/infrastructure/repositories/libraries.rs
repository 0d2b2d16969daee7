use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::RepositoryError;
use crate::domain::books::BookRecord;
use crate::domain::ids::LibraryId;
use crate::domain::preferences::ReadingPreferences;
use crate::domain::repositories::{LibraryRepository, LibrarySnapshot};

#[derive(Debug, Default)]
struct StoredLibrary {
    books: Arc<Vec<BookRecord>>,
    preferences: ReadingPreferences,
    revision: u64,
}

impl StoredLibrary {
    fn snapshot(&self, id: &LibraryId) -> LibrarySnapshot {
        LibrarySnapshot {
            library_id: id.clone(),
            books: Arc::clone(&self.books),
            preferences: self.preferences,
            revision: self.revision,
        }
    }
}

/// Library snapshots held in process memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryLibraryRepository {
    libraries: RwLock<BTreeMap<LibraryId, StoredLibrary>>,
    // Shared across libraries so a deleted and recreated library never
    // reuses an old revision.
    next_revision: AtomicU64,
}

impl InMemoryLibraryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the revision counter at `revision` instead of zero.
    #[cfg(test)]
    fn with_revision(revision: u64) -> Self {
        Self {
            next_revision: AtomicU64::new(revision),
            ..Self::default()
        }
    }

    /// Allocate the next revision. Callers hold the write lock, so stored
    /// revisions only ever grow.
    fn bump(&self) -> Result<u64, RepositoryError> {
        self.next_revision
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .map(|previous| previous + 1)
            .map_err(|_| RepositoryError::unexpected("library revision counter exhausted"))
    }
}

#[async_trait]
impl LibraryRepository for InMemoryLibraryRepository {
    async fn replace_books(
        &self,
        id: &LibraryId,
        books: Vec<BookRecord>,
    ) -> Result<LibrarySnapshot, RepositoryError> {
        let mut libraries = self.libraries.write().await;
        let revision = self.bump()?;
        let library = libraries.entry(id.clone()).or_default();
        library.books = Arc::new(books);
        library.revision = revision;
        Ok(library.snapshot(id))
    }

    async fn set_preferences(
        &self,
        id: &LibraryId,
        preferences: ReadingPreferences,
    ) -> Result<LibrarySnapshot, RepositoryError> {
        let mut libraries = self.libraries.write().await;
        let revision = self.bump()?;
        let library = libraries.entry(id.clone()).or_default();
        library.preferences = preferences;
        library.revision = revision;
        Ok(library.snapshot(id))
    }

    async fn get(&self, id: &LibraryId) -> Result<LibrarySnapshot, RepositoryError> {
        let libraries = self.libraries.read().await;
        libraries
            .get(id)
            .map(|library| library.snapshot(id))
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: &LibraryId) -> Result<(), RepositoryError> {
        let mut libraries = self.libraries.write().await;
        libraries
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_ids(&self) -> Result<Vec<LibraryId>, RepositoryError> {
        let libraries = self.libraries.read().await;
        Ok(libraries.keys().cloned().collect())
    }
}
