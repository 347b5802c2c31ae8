pub mod credentials;
pub mod provider;
pub mod query;
pub mod rotator;
pub mod router;

pub use credentials::{ProviderAccounts, SearchCredential};
pub use provider::{
    HttpSearchBackend, ProviderReply, SearchBackend, SearchResultItem, TransportError,
};
pub use query::{build_query, SearchFilters, SearchQuery, COUNTRY_SITES};
pub use rotator::{ProviderError, ProviderRotator};
pub use router::{search_router, SearchResponse};
