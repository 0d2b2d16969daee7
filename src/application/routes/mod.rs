pub mod api;
pub(crate) mod support;

use std::time::Duration;

use axum::extract::MatchedPath;
use axum::http::{HeaderValue, Request, Response, header};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{MakeSpan, OnResponse, TraceLayer};
use tracing::{Span, field, info};

use crate::application::state::AppState;

/// Largest accepted request body. A library upload is one JSON document.
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// The full HTTP application: every API route under `/api/v1`.
pub fn app_router(state: AppState) -> axum::Router {
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(RouteSpan)
                .on_response(LogLatency),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new().gzip(true))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));

    axum::Router::new()
        .nest("/api/v1", api::router())
        .layer(middleware)
        .with_state(state)
}

/// One span per request, named after the matched route template so that
/// `/libraries/alice/stats` and `/libraries/bob/stats` group together.
/// `library.id` is filled in by the library path extractor.
#[derive(Clone, Copy)]
struct RouteSpan;

impl<B> MakeSpan<B> for RouteSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map_or_else(|| request.uri().path(), MatchedPath::as_str);

        tracing::info_span!(
            "http",
            http.method = %request.method(),
            http.route = route,
            http.status = field::Empty,
            library.id = field::Empty,
        )
    }
}

#[derive(Clone, Copy)]
struct LogLatency;

impl<B> OnResponse<B> for LogLatency {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();
        span.record("http.status", status);
        info!(status, latency_ms = latency.as_millis(), "request handled");
    }
}
