// Domain models (backend entities and search types)
// Pure Rust, no transport dependencies

pub mod chat;
pub mod search;

pub use chat::{Tag, Transcription};
pub use search::{AdvancedSearchResponse, SearchFilters, SearchRequest, SearchRoute, TagFacet};
