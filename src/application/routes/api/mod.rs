pub(crate) mod health;
pub(crate) mod libraries;
pub(crate) mod stats;

use axum::routing::{get, post, put};

use crate::application::state::AppState;

pub(super) fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/health", get(health::health))
        .route("/stats", post(stats::compute_stats))
        .merge(library_routes())
}

fn library_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/libraries", get(libraries::list_libraries))
        .route(
            "/libraries/{id}",
            axum::routing::delete(libraries::delete_library),
        )
        .route(
            "/libraries/{id}/books",
            put(libraries::replace_books).get(libraries::get_books),
        )
        .route(
            "/libraries/{id}/preferences",
            get(libraries::get_preferences).put(libraries::update_preferences),
        )
        .route("/libraries/{id}/stats", get(stats::library_stats))
        .route("/libraries/{id}/years", get(libraries::library_years))
}
