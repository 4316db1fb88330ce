pub mod constants;
pub mod errors;
pub mod utils;

pub mod consolidation;
pub mod dedup;
pub mod normalization;
pub mod versioning;

pub use consolidation::*;
pub use dedup::*;
pub use normalization::*;
pub use versioning::*;

pub use errors::{Error, Result};
