use axum::Json;
use axum::extract::{Query, State};
use chrono::Local;
use serde::Deserialize;

use crate::application::errors::{ApiError, AppError};
use crate::application::routes::support::{JsonBody, LibraryPath, YEAR_RANGE, YearQuery};
use crate::application::services::CachedStats;
use crate::application::state::AppState;
use crate::domain::books::BookRecord;
use crate::domain::calculator::compute_library_statistics;
use crate::domain::preferences::ReadingPreferences;
use crate::domain::stats::StatsBundle;

/// Body of a one-off statistics request.
#[derive(Debug, Deserialize)]
pub(crate) struct StatsRequest {
    books: Vec<BookRecord>,
    #[serde(default)]
    preferences: ReadingPreferences,
    #[serde(default)]
    year: Option<i32>,
}

/// Compute statistics for the posted books without storing anything.
#[tracing::instrument(
    skip(request),
    fields(book_count = request.books.len(), year = ?request.year)
)]
pub(crate) async fn compute_stats(
    JsonBody(request): JsonBody<StatsRequest>,
) -> Result<Json<StatsBundle>, ApiError> {
    request.preferences.validate().map_err(AppError::from)?;
    if let Some(year) = request.year
        && !YEAR_RANGE.contains(&year)
    {
        return Err(AppError::validation(format!(
            "year must be between {} and {}",
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        ))
        .into());
    }

    let stats = compute_library_statistics(
        &request.books,
        request.preferences,
        request.year,
        Local::now().date_naive(),
    );
    Ok(Json(stats))
}

/// Memoized statistics for a stored library.
#[tracing::instrument(skip(state, query))]
pub(crate) async fn library_stats(
    State(state): State<AppState>,
    LibraryPath(library_id): LibraryPath,
    Query(query): Query<YearQuery>,
) -> Result<Json<CachedStats>, ApiError> {
    let year = query.year_filter()?;
    let cached = state.stats_service.stats_for(&library_id, year).await?;
    Ok(Json(cached))
}
