// External collaborators: search backends and speech recognition

pub mod api;
pub mod speech;
