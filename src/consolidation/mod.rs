mod consolidation_model;
mod consolidation_service;

pub use consolidation_model::*;
pub use consolidation_service::*;
