use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use crate::application::errors::{ApiError, AppError};
use crate::application::routes::support::{JsonBody, LibraryPath};
use crate::application::state::AppState;
use crate::domain::books::{BookRecord, available_years};
use crate::domain::ids::LibraryId;
use crate::domain::preferences::ReadingPreferences;
use crate::domain::repositories::LibrarySummary;

#[tracing::instrument(skip(state))]
pub(crate) async fn list_libraries(
    State(state): State<AppState>,
) -> Result<Json<Vec<LibraryId>>, ApiError> {
    let ids = state.library_repo.list_ids().await?;
    Ok(Json(ids))
}

#[tracing::instrument(skip(state, books), fields(book_count = books.len()))]
pub(crate) async fn replace_books(
    State(state): State<AppState>,
    LibraryPath(library_id): LibraryPath,
    JsonBody(books): JsonBody<Vec<BookRecord>>,
) -> Result<Json<LibrarySummary>, ApiError> {
    let snapshot = state.library_repo.replace_books(&library_id, books).await?;

    info!(%library_id, revision = snapshot.revision, books = snapshot.books.len(), "library books replaced");
    state.stats_invalidator.invalidate(library_id);

    Ok(Json(LibrarySummary::from(&snapshot)))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_books(
    State(state): State<AppState>,
    LibraryPath(library_id): LibraryPath,
) -> Result<Json<Vec<BookRecord>>, ApiError> {
    let snapshot = state.library_repo.get(&library_id).await?;
    Ok(Json(snapshot.books.as_ref().clone()))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_preferences(
    State(state): State<AppState>,
    LibraryPath(library_id): LibraryPath,
) -> Result<Json<ReadingPreferences>, ApiError> {
    let snapshot = state.library_repo.get(&library_id).await?;
    Ok(Json(snapshot.preferences))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn update_preferences(
    State(state): State<AppState>,
    LibraryPath(library_id): LibraryPath,
    JsonBody(preferences): JsonBody<ReadingPreferences>,
) -> Result<Json<ReadingPreferences>, ApiError> {
    preferences.validate().map_err(AppError::from)?;

    let snapshot = state
        .library_repo
        .set_preferences(&library_id, preferences)
        .await?;

    info!(%library_id, revision = snapshot.revision, "library preferences updated");
    state.stats_invalidator.invalidate(library_id);

    Ok(Json(snapshot.preferences))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn delete_library(
    State(state): State<AppState>,
    LibraryPath(library_id): LibraryPath,
) -> Result<StatusCode, ApiError> {
    state.library_repo.delete(&library_id).await?;
    state.stats_service.evict(&library_id).await;

    info!(%library_id, "library deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
pub(crate) async fn library_years(
    State(state): State<AppState>,
    LibraryPath(library_id): LibraryPath,
) -> Result<Json<Vec<i32>>, ApiError> {
    let snapshot = state.library_repo.get(&library_id).await?;
    Ok(Json(available_years(&snapshot.books)))
}
