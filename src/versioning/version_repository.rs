use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{VersionInfo, VersionStoreTrait};
use crate::consolidation::PortfolioSnapshot;
use crate::constants::{
    DATE_KEY_FORMAT, LATEST_POINTER_FILE, SNAPSHOT_FILE_EXT, SNAPSHOT_FILE_PREFIX,
};
use crate::errors::{Result, StoreError};

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
struct LatestPointer {
    date: NaiveDate,
}

/// File-backed version store: one `portfolio_<YYYY-MM-DD>.json` per date
/// key under the base directory, plus a `latest.json` pointer holding the
/// maximum date key for O(1) latest resolution.
///
/// Writes go to a temporary file first and are moved into place with an
/// atomic rename, so a reader never observes a partially written snapshot.
/// Concurrent saves for the same date key are not mutually exclusive;
/// single-writer usage is an operating assumption, not an enforced
/// guarantee.
#[derive(Debug, Clone)]
pub struct FileVersionStore {
    dir: PathBuf,
}

impl FileVersionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileVersionStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}{}.{}",
            SNAPSHOT_FILE_PREFIX,
            date.format(DATE_KEY_FORMAT),
            SNAPSHOT_FILE_EXT
        ))
    }

    fn pointer_path(&self) -> PathBuf {
        self.dir.join(LATEST_POINTER_FILE)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn read_pointer(&self) -> Option<NaiveDate> {
        let bytes = fs::read(self.pointer_path()).ok()?;
        match serde_json::from_slice::<LatestPointer>(&bytes) {
            Ok(pointer) => Some(pointer.date),
            Err(err) => {
                warn!("Unreadable latest pointer, falling back to scan: {}", err);
                None
            }
        }
    }

    /// Moves the pointer forward to `date` if it is newer than the current
    /// one. Backfilling an older date never regresses the pointer.
    fn advance_pointer(&self, date: NaiveDate) -> Result<()> {
        let current = self.read_pointer();
        if current.is_some_and(|c| c >= date) {
            return Ok(());
        }
        let bytes = serde_json::to_vec_pretty(&LatestPointer { date })?;
        self.write_atomic(&self.pointer_path(), &bytes)
    }

    fn parse_snapshot_file_name(name: &str) -> Option<NaiveDate> {
        let stem = name
            .strip_prefix(SNAPSHOT_FILE_PREFIX)?
            .strip_suffix(&format!(".{}", SNAPSHOT_FILE_EXT))?;
        NaiveDate::parse_from_str(stem, DATE_KEY_FORMAT).ok()
    }
}

impl VersionStoreTrait for FileVersionStore {
    fn save(&self, snapshot: &PortfolioSnapshot) -> Result<()> {
        let path = self.snapshot_path(snapshot.snapshot_date);
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        self.write_atomic(&path, &bytes)?;
        self.advance_pointer(snapshot.snapshot_date)?;
        debug!(
            "Saved snapshot for {} ({} holdings) to {}",
            snapshot.snapshot_date,
            snapshot.holding_count,
            path.display()
        );
        Ok(())
    }

    fn load(&self, date: NaiveDate) -> Result<PortfolioSnapshot> {
        let path = self.snapshot_path(date);
        let bytes = fs::read(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StoreError::SnapshotNotFound(date)
            } else {
                StoreError::Io(err)
            }
        })?;
        let snapshot = serde_json::from_slice(&bytes).map_err(StoreError::Serialization)?;
        Ok(snapshot)
    }

    fn list_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(date) = name.to_str().and_then(Self::parse_snapshot_file_name) {
                dates.push(date);
            }
        }
        dates.sort();
        Ok(dates)
    }

    fn list_versions(&self) -> Result<Vec<VersionInfo>> {
        self.list_dates()?
            .into_iter()
            .map(|date| {
                let snapshot = self.load(date)?;
                Ok(VersionInfo {
                    date,
                    holding_count: snapshot.holding_count,
                    total_value: snapshot.total_value,
                })
            })
            .collect()
    }

    fn latest(&self) -> Result<PortfolioSnapshot> {
        self.load(self.latest_date()?)
    }

    fn latest_date(&self) -> Result<NaiveDate> {
        if let Some(date) = self.read_pointer() {
            if self.snapshot_path(date).exists() {
                return Ok(date);
            }
            warn!(
                "Latest pointer references missing snapshot for {}; rescanning",
                date
            );
        }
        self.list_dates()?
            .last()
            .copied()
            .ok_or_else(|| StoreError::NoSnapshots.into())
    }
}
