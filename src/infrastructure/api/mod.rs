// Search backends
// The trait seam plus the HTTP implementation

pub mod http;
pub mod traits;

pub use http::HttpSearchApi;
pub use traits::{ApiError, ApiResult, SearchApi};
