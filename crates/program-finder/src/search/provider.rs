use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::credentials::SearchCredential;

/// Status and raw body of one provider call, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("search transport failed: {0}")]
pub struct TransportError(pub String);

/// One attempt against the provider with a single credential.
#[async_trait]
pub trait SearchBackend: Debug + Send + Sync {
    async fn execute(
        &self,
        query: &str,
        credential: &SearchCredential,
        engine_id: &str,
    ) -> Result<ProviderReply, TransportError>;
}

/// Result item exposed to callers. Every other provider field is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub display_link: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderPayload {
    #[serde(default)]
    pub(crate) items: Vec<ProviderItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProviderItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    display_link: String,
}

impl From<ProviderItem> for SearchResultItem {
    fn from(item: ProviderItem) -> Self {
        Self {
            title: item.title,
            link: item.link,
            snippet: item.snippet,
            display_link: item.display_link,
        }
    }
}

/// Custom-search JSON API over reqwest.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: Client,
    endpoint: String,
    result_count: u8,
}

impl HttpSearchBackend {
    pub fn new(
        endpoint: impl Into<String>,
        result_count: u8,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            result_count,
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn execute(
        &self,
        query: &str,
        credential: &SearchCredential,
        engine_id: &str,
    ) -> Result<ProviderReply, TransportError> {
        let num = self.result_count.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", credential.key()),
                ("cx", engine_id),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|err| TransportError(err.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError(err.without_url().to_string()))?;
        Ok(ProviderReply { status, body })
    }
}
