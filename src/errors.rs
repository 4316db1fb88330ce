use chrono::NaiveDate;
use thiserror::Error;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the consolidation engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("Version store operation failed: {0}")]
    Store(#[from] StoreError),
}

/// Record-scoped failures. A record hitting one of these is dropped and
/// logged; processing of the remaining records continues.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no recognizable numeric pattern in '{0}'")]
    InvalidNumber(String),
}

/// Configuration failures are fatal at the start of a run, before any
/// record is processed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown deduplication strategy '{0}', expected one of: aggregate, prioritize, latest")]
    UnknownStrategy(String),

    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no snapshot found for date {0}")]
    SnapshotNotFound(NaiveDate),

    #[error("no snapshots have been saved")]
    NoSnapshots,

    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Store(StoreError::Io(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Store(StoreError::Serialization(err))
    }
}
