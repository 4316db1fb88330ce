mod version_comparator;
mod version_repository;
mod versioning_model;
mod versioning_traits;

pub use version_comparator::*;
pub use version_repository::*;
pub use versioning_model::*;
pub use versioning_traits::*;
