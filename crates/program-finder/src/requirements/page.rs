use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::FetchConfig;

const MAX_REDIRECTS: usize = 10;

/// Raw markup of one fetched page. Lives only for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub html: String,
    pub final_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("network failure: {0}")]
    Network(String),
    #[error("upstream responded with HTTP {0}")]
    Http(u16),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Short machine-readable label used in degraded responses.
    pub fn kind(&self) -> String {
        match self {
            FetchError::Timeout => "timeout".to_string(),
            FetchError::Network(_) => "network".to_string(),
            FetchError::Http(status) => format!("http_{status}"),
            FetchError::InvalidUrl(_) => "invalid_url".to_string(),
        }
    }
}

/// Retrieval seam so the pipeline can run against fixtures in tests.
#[async_trait]
pub trait PageFetcher: Debug + Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError>;
}

/// reqwest-backed fetcher with a fixed identity, bounded timeout, and
/// redirect following. No state is shared between calls apart from the
/// connection pool.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|err| FetchError::Network(format!("invalid Accept-Language: {err}")))?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;

        Ok(Self { client })
    }

    fn map_error(err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Http(status.as_u16())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(Self::map_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(Self::map_error)?;
        debug!(url = %url, %final_url, bytes = html.len(), "fetched page");

        Ok(Page {
            url: url.to_string(),
            html,
            final_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(5),
            user_agent: "ProgramFinderTest/1.0".to_string(),
            accept_language: "en".to_string(),
        }
    }

    #[tokio::test]
    async fn follows_redirects_and_reports_final_url() {
        let mut server = mockito::Server::new_async().await;
        let target = format!("{}/programme/msc-data", server.url());
        let redirect = server
            .mock("GET", "/p/123")
            .with_status(301)
            .with_header("location", &target)
            .create_async()
            .await;
        let page = server
            .mock("GET", "/programme/msc-data")
            .match_header("user-agent", "ProgramFinderTest/1.0")
            .match_header("accept-language", "en")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body>MSc Data Science</body></html>")
            .create_async()
            .await;

        let fetcher = HttpPageFetcher::new(&config()).expect("client builds");
        let start = Url::parse(&format!("{}/p/123", server.url())).expect("valid url");
        let fetched = fetcher.fetch(&start).await.expect("page fetched");

        redirect.assert_async().await;
        page.assert_async().await;
        assert_eq!(fetched.url, start.to_string());
        assert_eq!(fetched.final_url, target);
        assert!(fetched.html.contains("MSc Data Science"));
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpPageFetcher::new(&config()).expect("client builds");
        let url = Url::parse(&format!("{}/gone", server.url())).expect("valid url");
        let err = fetcher.fetch(&url).await.expect_err("404 fails");

        assert_eq!(err, FetchError::Http(404));
        assert_eq!(err.kind(), "http_404");
    }
}
