use std::sync::Arc;

use tracing::{debug, error, warn};

use super::credentials::ProviderAccounts;
use super::provider::{ProviderPayload, ProviderReply, SearchBackend, SearchResultItem};
use super::query::SearchQuery;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("search provider misconfigured: {0}")]
    Misconfigured(&'static str),
    #[error("all {attempts} search credentials are rate-limited or rejected")]
    QuotaExhausted { attempts: usize },
    #[error("search provider error: {0}")]
    Provider(String),
}

impl ProviderError {
    /// In-band error code returned by `/search`. Misconfiguration is reported
    /// like a provider failure; the variant itself is kept for logs.
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::QuotaExhausted { .. } => "quota_exhausted",
            ProviderError::Misconfigured(_) | ProviderError::Provider(_) => "cse_error",
        }
    }
}

/// How one provider reply moves the rotation forward.
enum Attempt {
    Success(Vec<SearchResultItem>),
    Retryable,
    Fatal(String),
}

fn classify(reply: ProviderReply) -> Attempt {
    match reply.status {
        429 | 403 => Attempt::Retryable,
        200..=299 => match serde_json::from_str::<ProviderPayload>(&reply.body) {
            Ok(payload) => Attempt::Success(
                payload
                    .items
                    .into_iter()
                    .map(SearchResultItem::from)
                    .collect(),
            ),
            Err(err) => Attempt::Fatal(format!("malformed response: {err}")),
        },
        status => Attempt::Fatal(format!("HTTP {status}")),
    }
}

/// Runs a query against the configured credentials strictly in order.
///
/// Quota or auth rejections (429/403) move on to the next credential with no
/// delay. Any other failure stops immediately without touching the remaining
/// credentials. Running out of credentials is reported separately from a
/// provider failure.
#[derive(Debug)]
pub struct ProviderRotator<B> {
    backend: Arc<B>,
    accounts: ProviderAccounts,
}

impl<B> ProviderRotator<B>
where
    B: SearchBackend + 'static,
{
    pub fn new(backend: Arc<B>, accounts: ProviderAccounts) -> Self {
        Self { backend, accounts }
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultItem>, ProviderError> {
        let credentials = self.accounts.credentials();
        if credentials.is_empty() {
            return Err(ProviderError::Misconfigured("no search credentials configured"));
        }
        let engine_id = self.accounts.engine_id();
        if engine_id.is_empty() {
            return Err(ProviderError::Misconfigured("no search engine id configured"));
        }

        for (index, credential) in credentials.iter().enumerate() {
            let reply = self
                .backend
                .execute(query.as_str(), credential, engine_id)
                .await
                .map_err(|err| {
                    error!(credential = index, error = %err, "search transport failed");
                    ProviderError::Provider(err.to_string())
                })?;

            let status = reply.status;
            match classify(reply) {
                Attempt::Success(items) => {
                    debug!(credential = index, items = items.len(), "search succeeded");
                    return Ok(items);
                }
                Attempt::Retryable => {
                    warn!(credential = index, status, "credential rejected, rotating");
                }
                Attempt::Fatal(reason) => {
                    error!(credential = index, %reason, "search provider failed");
                    return Err(ProviderError::Provider(reason));
                }
            }
        }

        Err(ProviderError::QuotaExhausted {
            attempts: credentials.len(),
        })
    }
}
