use chrono::NaiveDate;

use super::VersionInfo;
use crate::consolidation::PortfolioSnapshot;
use crate::errors::Result;

/// Date-keyed persistence for consolidated snapshots.
///
/// `save` is idempotent per date key and must be atomic: a reader never
/// observes a partially written snapshot. `latest` always resolves to the
/// maximum date key present.
pub trait VersionStoreTrait: Send + Sync {
    fn save(&self, snapshot: &PortfolioSnapshot) -> Result<()>;

    /// Fails with `StoreError::SnapshotNotFound` for an absent date key.
    fn load(&self, date: NaiveDate) -> Result<PortfolioSnapshot>;

    /// All persisted date keys, ascending.
    fn list_dates(&self) -> Result<Vec<NaiveDate>>;

    /// Listing metadata for every persisted snapshot, ascending by date.
    fn list_versions(&self) -> Result<Vec<VersionInfo>>;

    /// Fails with `StoreError::NoSnapshots` when nothing has been saved.
    fn latest(&self) -> Result<PortfolioSnapshot>;

    fn latest_date(&self) -> Result<NaiveDate>;
}
