use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{Span, warn};

use crate::application::errors::{ApiError, AppError};
use crate::domain::ids::LibraryId;

/// Oldest and newest completion year accepted by the `year` query parameter.
pub(crate) const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2200;

/// Validated `{id}` path segment of a library route.
#[derive(Debug, Clone)]
pub(crate) struct LibraryPath(pub LibraryId);

impl<S> FromRequestParts<S> for LibraryPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::from(AppError::validation("missing library id")))?;

        let Some(id) = LibraryId::parse(&raw) else {
            warn!(library_id = %raw, "rejected invalid library id");
            return Err(AppError::validation(
                "library id must be 1-64 characters of letters, digits, '-' or '_'",
            )
            .into());
        };

        Span::current().record("library.id", tracing::field::display(&id));
        Ok(LibraryPath(id))
    }
}

/// JSON request body whose rejections are reported as `ErrorResponse`
/// validation errors.
#[derive(Debug)]
pub(crate) struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(payload)) => Ok(Self(payload)),
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "failed to parse JSON payload");
                Err(AppError::validation(json_rejection_message(&rejection)).into())
            }
        }
    }
}

fn json_rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "expected request with `Content-Type: application/json`".to_string()
        }
        _ => format!("invalid JSON payload: {}", rejection.body_text()),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct YearQuery {
    year: Option<String>,
}

impl YearQuery {
    /// Parse the year filter, treating "all" or absent as no filter.
    pub fn year_filter(&self) -> Result<Option<i32>, AppError> {
        parse_year_filter(self.year.as_deref())
    }
}

pub(crate) fn parse_year_filter(year: Option<&str>) -> Result<Option<i32>, AppError> {
    let Some(raw) = year.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    raw.parse::<i32>()
        .ok()
        .filter(|y| YEAR_RANGE.contains(y))
        .map(Some)
        .ok_or_else(|| {
            AppError::validation(format!(
                "year must be 'all' or between {} and {}",
                YEAR_RANGE.start(),
                YEAR_RANGE.end()
            ))
        })
}
