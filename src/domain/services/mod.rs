// Business logic services
// Transport-agnostic, driven through the SearchApi trait

pub mod search_orchestrator;

pub use search_orchestrator::SearchOrchestrator;
