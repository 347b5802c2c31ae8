use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use url::Url;

use super::page::PageFetcher;
use super::service::RequirementsService;
use super::signal::RequirementsResponse;

#[derive(Debug, Default, Deserialize)]
pub struct RequirementsParams {
    pub url: Option<String>,
}

/// Router exposing `GET /requirements`.
pub fn requirements_router<F>(service: Arc<RequirementsService<F>>) -> Router
where
    F: PageFetcher + 'static,
{
    Router::new()
        .route("/requirements", get(requirements_handler::<F>))
        .with_state(service)
}

pub(crate) async fn requirements_handler<F>(
    State(service): State<Arc<RequirementsService<F>>>,
    params: Result<Query<RequirementsParams>, QueryRejection>,
) -> Response
where
    F: PageFetcher + 'static,
{
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable requirements query");
            RequirementsParams::default()
        }
    };
    let Some(url) = params.url.as_deref().and_then(parse_program_url) else {
        let payload = json!({ "error": "missing_url" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    };

    match service.requirements(&url).await {
        Ok(record) => (StatusCode::OK, Json(RequirementsResponse::from(record))).into_response(),
        Err(err) => {
            warn!(url = %url, error = %err, "primary page unavailable");
            let payload = RequirementsResponse::degraded("fetch_failed", err.kind());
            (StatusCode::OK, Json(payload)).into_response()
        }
    }
}

/// Accepts absolute `http`/`https` URLs with a host.
pub fn parse_program_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_absolute_web_urls_are_accepted() {
        assert!(parse_program_url(" https://uni.example/msc ").is_some());
        assert!(parse_program_url("http://uni.example").is_some());
        assert!(parse_program_url("/relative/path").is_none());
        assert!(parse_program_url("ftp://uni.example/file").is_none());
        assert!(parse_program_url("").is_none());
    }
}
