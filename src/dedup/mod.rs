mod dedup_model;
mod dedup_service;

pub use dedup_model::*;
pub use dedup_service::*;

#[cfg(test)]
mod dedup_service_tests;
