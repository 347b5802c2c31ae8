use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::warn;

use super::provider::{SearchBackend, SearchResultItem};
use super::query::{build_query, SearchFilters};
use super::rotator::ProviderRotator;

/// Body of `GET /search`. Always served with 200; failures are in-band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub items: Vec<SearchResultItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// Router exposing `GET /search`.
pub fn search_router<B>(rotator: Arc<ProviderRotator<B>>) -> Router
where
    B: SearchBackend + 'static,
{
    Router::new()
        .route("/search", get(search_handler::<B>))
        .with_state(rotator)
}

pub(crate) async fn search_handler<B>(
    State(rotator): State<Arc<ProviderRotator<B>>>,
    filters: Result<Query<SearchFilters>, QueryRejection>,
) -> Json<SearchResponse>
where
    B: SearchBackend + 'static,
{
    let filters = match filters {
        Ok(Query(filters)) => filters,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable search query");
            return Json(SearchResponse {
                items: Vec::new(),
                error: Some("cse_error"),
                q: None,
            });
        }
    };
    let query = build_query(&filters);
    match rotator.search(&query).await {
        Ok(items) => Json(SearchResponse {
            items,
            error: None,
            q: Some(query.into_inner()),
        }),
        Err(err) => Json(SearchResponse {
            items: Vec::new(),
            error: Some(err.code()),
            q: None,
        }),
    }
}
