// Public API exports
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::SearchConfig;
pub use domain::models::{SearchFilters, SearchRequest, TagFacet, Transcription};
pub use domain::services::SearchOrchestrator;
pub use infrastructure::api::{ApiError, HttpSearchApi, SearchApi};
pub use shared::errors::{AppError, Result};
pub use shared::state::ResultState;
