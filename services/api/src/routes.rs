use crate::infra::{AppState, ProgramServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use program_finder::requirements::{requirements_router, PageFetcher, RequirementsService};
use program_finder::search::{search_router, ProviderRotator, SearchBackend};
use serde_json::json;
use std::sync::Arc;

/// Public API plus the operational endpoints.
pub(crate) fn with_program_routes<F, B>(
    requirements: Arc<RequirementsService<F>>,
    search: Arc<ProviderRotator<B>>,
) -> Router
where
    F: PageFetcher + 'static,
    B: SearchBackend + 'static,
{
    requirements_router(requirements)
        .merge(search_router(search))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

impl ProgramServices {
    pub(crate) fn into_router(self) -> Router {
        with_program_routes(self.requirements, self.search)
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
