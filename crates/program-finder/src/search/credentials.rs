use std::fmt;
use std::sync::Arc;

/// One provider API key. The key never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchCredential(Arc<str>);

impl SearchCredential {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SearchCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SearchCredential").field(&"<redacted>").finish()
    }
}

/// Ordered credential list plus engine identifier, loaded once at startup
/// and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct ProviderAccounts {
    credentials: Arc<[SearchCredential]>,
    engine_id: Arc<str>,
}

impl ProviderAccounts {
    pub fn new(credentials: Vec<SearchCredential>, engine_id: impl AsRef<str>) -> Self {
        Self {
            credentials: credentials.into(),
            engine_id: Arc::from(engine_id.as_ref().trim()),
        }
    }

    pub fn credentials(&self) -> &[SearchCredential] {
        &self.credentials
    }

    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }
}
