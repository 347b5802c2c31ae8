pub mod extract;
pub mod links;
pub mod merge;
pub mod page;
pub mod router;
pub mod service;
pub mod signal;
pub mod text;

pub use extract::{extract, FieldExtractor, PIPELINE};
pub use links::{discover_links, related_links, MAX_RELATED_PAGES};
pub use merge::{merge, MAX_MERGED_NOTES};
pub use page::{FetchError, HttpPageFetcher, Page, PageFetcher};
pub use router::{parse_program_url, requirements_router, RequirementsParams};
pub use service::RequirementsService;
pub use signal::{AdmissionRecord, AdmissionSignal, RequirementsResponse, SignalNote};
pub use text::{canonical_link, normalize_text};
