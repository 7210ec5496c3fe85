// Domain layer: entities and the search orchestration built on them
pub mod models;
pub mod services;
