#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use program_finder::requirements::{FetchError, Page, PageFetcher};
use program_finder::search::{ProviderReply, SearchBackend, SearchCredential, TransportError};
use url::Url;

#[derive(Debug, Clone)]
pub enum Fixture {
    Html { final_url: String, html: String },
    Fail(FetchError),
    Stall(Duration),
}

/// Serves canned pages keyed by URL and records every fetch.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, Fixture>,
    calls: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Fixture::Html {
                final_url: url.to_string(),
                html: html.to_string(),
            },
        );
        self
    }

    pub fn redirected(mut self, url: &str, final_url: &str, html: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Fixture::Html {
                final_url: final_url.to_string(),
                html: html.to_string(),
            },
        );
        self
    }

    pub fn failing(mut self, url: &str, error: FetchError) -> Self {
        self.pages.insert(url.to_string(), Fixture::Fail(error));
        self
    }

    pub fn stalling(mut self, url: &str, delay: Duration) -> Self {
        self.pages.insert(url.to_string(), Fixture::Stall(delay));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex").clone()
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        self.calls.lock().expect("calls mutex").push(url.to_string());
        match self.pages.get(url.as_str()).cloned() {
            Some(Fixture::Html { final_url, html }) => Ok(Page {
                url: url.to_string(),
                html,
                final_url,
            }),
            Some(Fixture::Fail(error)) => Err(error),
            Some(Fixture::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Err(FetchError::Network("stalled fixture".to_string()))
            }
            None => Err(FetchError::Http(404)),
        }
    }
}

/// Replies with a scripted status/body per credential key and records the
/// order in which keys were tried.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: HashMap<String, Result<ProviderReply, TransportError>>,
    attempts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn reply(mut self, key: &str, status: u16, body: &str) -> Self {
        self.replies.insert(
            key.to_string(),
            Ok(ProviderReply {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn transport_failure(mut self, key: &str) -> Self {
        self.replies.insert(
            key.to_string(),
            Err(TransportError("connection reset".to_string())),
        );
        self
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().expect("attempts mutex").clone()
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn execute(
        &self,
        _query: &str,
        credential: &SearchCredential,
        _engine_id: &str,
    ) -> Result<ProviderReply, TransportError> {
        self.attempts
            .lock()
            .expect("attempts mutex")
            .push(credential.key().to_string());
        self.replies
            .get(credential.key())
            .cloned()
            .unwrap_or_else(|| Err(TransportError(format!("unscripted key {}", credential.key()))))
    }
}

pub fn credentials(keys: &[&str]) -> Vec<SearchCredential> {
    keys.iter().map(SearchCredential::new).collect()
}

pub const RESULTS_BODY: &str = r#"{
    "kind": "customsearch#search",
    "searchInformation": { "totalResults": "2" },
    "items": [
        {
            "kind": "customsearch#result",
            "title": "MSc Data Science | Aarhus University",
            "link": "https://www.au.dk/msc-data-science",
            "displayLink": "www.au.dk",
            "snippet": "Two-year English-taught master's programme.",
            "pagemap": { "metatags": [] }
        },
        {
            "title": "Data Science (MSc) - DTU",
            "link": "https://www.dtu.dk/data-science",
            "displayLink": "www.dtu.dk",
            "snippet": "120 ECTS programme."
        }
    ]
}"#;

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
