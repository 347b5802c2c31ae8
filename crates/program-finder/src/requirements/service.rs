use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};
use url::Url;

use super::extract::extract;
use super::links::{discover_links, related_links};
use super::merge::merge;
use super::page::{FetchError, Page, PageFetcher};
use super::signal::{AdmissionRecord, AdmissionSignal};
use super::text::{canonical_link, normalize_text};

/// Fetch → related-link discovery → per-page extraction → merge.
///
/// The primary page is mandatory; related pages are fetched concurrently,
/// each under its own deadline, and any that fail are left out of the merge.
#[derive(Debug)]
pub struct RequirementsService<F> {
    fetcher: Arc<F>,
    timeout: Duration,
}

impl<F> RequirementsService<F>
where
    F: PageFetcher + 'static,
{
    pub fn new(fetcher: Arc<F>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    pub async fn requirements(&self, url: &Url) -> Result<AdmissionRecord, FetchError> {
        let primary = self.fetch_with_deadline(url).await?;
        let base = Url::parse(&primary.final_url).unwrap_or_else(|_| url.clone());

        let related = related_links(&discover_links(&primary.html), &base);
        debug!(url = %url, related = related.len(), "related admission pages selected");

        let secondary = join_all(related.iter().map(|link| self.fetch_with_deadline(link))).await;

        let mut signals = vec![page_signal(&primary)];
        for (link, outcome) in related.iter().zip(secondary) {
            match outcome {
                Ok(page) => {
                    let signal = page_signal(&page);
                    if signal.is_empty() {
                        debug!(url = %link, "related page carried no admission signals");
                    }
                    signals.push(signal);
                }
                Err(err) => warn!(url = %link, error = %err, "dropping related page"),
            }
        }

        let canonical = canonical_link(&primary.html, &primary.final_url)
            .unwrap_or_else(|| primary.final_url.clone());
        let record = merge(&signals, canonical);
        debug!(pages = signals.len(), canonical = %record.canonical, "merged admission record");
        Ok(record)
    }

    async fn fetch_with_deadline(&self, url: &Url) -> Result<Page, FetchError> {
        match tokio::time::timeout(self.timeout, self.fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }
}

fn page_signal(page: &Page) -> AdmissionSignal {
    extract(&normalize_text(&page.html)).attributed_to(&page.final_url)
}
