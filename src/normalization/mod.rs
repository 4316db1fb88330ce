mod alias_table;
mod normalization_model;
mod normalization_service;
mod numeric;

pub use alias_table::*;
pub use normalization_model::*;
pub use normalization_service::*;
pub use numeric::*;

#[cfg(test)]
mod normalization_service_tests;
