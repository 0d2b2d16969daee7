use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info};

use crate::domain::RepositoryError;
use crate::domain::calculator::compute_library_statistics;
use crate::domain::ids::LibraryId;
use crate::domain::repositories::LibraryRepository;
use crate::domain::stats::StatsBundle;

/// Statistics for one library view, as served by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedStats {
    pub stats: StatsBundle,
    pub computed_at: DateTime<Utc>,
    pub revision: u64,
    pub year: Option<i32>,
}

/// Everything a cached bundle was derived from. Preferences are covered by
/// the revision, which the repository bumps on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StatsKey {
    revision: u64,
    year: Option<i32>,
    today: NaiveDate,
}

struct CacheEntry {
    key: StatsKey,
    cached: CachedStats,
}

/// Computes library statistics and memoizes them per `(library, year)`.
///
/// An entry is reused only while its key matches the current revision, year
/// filter and evaluation date; anything else recomputes from scratch.
#[derive(Clone)]
pub struct StatsService {
    library_repo: Arc<dyn LibraryRepository>,
    cache: Arc<Mutex<HashMap<(LibraryId, Option<i32>), CacheEntry>>>,
}

impl StatsService {
    pub fn new(library_repo: Arc<dyn LibraryRepository>) -> Self {
        Self {
            library_repo,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Statistics as of the local calendar date.
    pub async fn stats_for(
        &self,
        library_id: &LibraryId,
        year: Option<i32>,
    ) -> Result<CachedStats, RepositoryError> {
        self.stats_for_date(library_id, year, Local::now().date_naive())
            .await
    }

    pub async fn stats_for_date(
        &self,
        library_id: &LibraryId,
        year: Option<i32>,
        today: NaiveDate,
    ) -> Result<CachedStats, RepositoryError> {
        let snapshot = self.library_repo.get(library_id).await?;
        let key = StatsKey {
            revision: snapshot.revision,
            year,
            today,
        };
        let cache_key = (library_id.clone(), year);

        if let Some(entry) = self.cache.lock().await.get(&cache_key)
            && entry.key == key
        {
            debug!(%library_id, revision = key.revision, "stats cache hit");
            return Ok(entry.cached.clone());
        }

        let start = Instant::now();
        let stats = compute_library_statistics(&snapshot.books, snapshot.preferences, year, today);
        let cached = CachedStats {
            stats,
            computed_at: Utc::now(),
            revision: snapshot.revision,
            year,
        };
        info!(
            duration_ms = start.elapsed().as_millis(),
            %library_id,
            revision = snapshot.revision,
            ?year,
            "stats computed"
        );

        // Re-read under the cache lock (which `evict` also takes): a library
        // deleted or rewritten mid-computation must not be cached.
        let mut cache = self.cache.lock().await;
        let current_revision = self
            .library_repo
            .get(library_id)
            .await
            .ok()
            .map(|current| current.revision);
        if current_revision == Some(key.revision) {
            cache.insert(
                cache_key,
                CacheEntry {
                    key,
                    cached: cached.clone(),
                },
            );
        } else {
            debug!(
                %library_id,
                revision = key.revision,
                "library changed during stats computation"
            );
        }
        Ok(cached)
    }

    /// Drop every cached view of a library.
    pub async fn evict(&self, library_id: &LibraryId) {
        self.cache
            .lock()
            .await
            .retain(|(id, _), _| id != library_id);
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.len()
    }
}

/// Sends invalidation signals to the background stats recomputer.
/// Non-blocking and fire-and-forget, safe to call from any handler.
#[derive(Clone)]
pub struct StatsInvalidator {
    tx: mpsc::Sender<LibraryId>,
}

impl StatsInvalidator {
    pub fn new(tx: mpsc::Sender<LibraryId>) -> Self {
        Self { tx }
    }

    /// Signal that stats need recomputation for the given library.
    pub fn invalidate(&self, library_id: LibraryId) {
        let _ = self.tx.try_send(library_id);
    }
}

/// Listens for invalidation signals, debounces, and warms the all-time
/// stats of every signalled library. Runs until all senders are dropped.
pub async fn stats_recomputation_task(
    mut rx: mpsc::Receiver<LibraryId>,
    service: StatsService,
    debounce: Duration,
) {
    loop {
        let Some(first_id) = rx.recv().await else {
            break;
        };

        // Debounce: wait then drain any accumulated signals, collecting unique ids
        let mut library_ids = HashSet::new();
        library_ids.insert(first_id);
        tokio::time::sleep(debounce).await;
        while let Ok(id) = rx.try_recv() {
            library_ids.insert(id);
        }

        for library_id in library_ids {
            match service.stats_for(&library_id, None).await {
                Ok(_) => {}
                Err(RepositoryError::NotFound) => service.evict(&library_id).await,
                Err(err) => error!(error = %err, %library_id, "stats recomputation failed"),
            }
        }
    }
}
