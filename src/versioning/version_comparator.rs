use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{HoldingChange, VersionDiff, VersionStoreTrait};
use crate::consolidation::PortfolioSnapshot;
use crate::constants::DEFAULT_SIGNIFICANT_CHANGE_THRESHOLD;
use crate::errors::Result;

/// Computes the structured difference between two snapshots.
///
/// The threshold is the relative value move (as a fraction of the older
/// value) above which a change is flagged significant; default 0.10.
#[derive(Debug, Clone)]
pub struct VersionComparator {
    significant_change_threshold: Decimal,
}

impl Default for VersionComparator {
    fn default() -> Self {
        VersionComparator {
            significant_change_threshold: Decimal::from_str(DEFAULT_SIGNIFICANT_CHANGE_THRESHOLD)
                .unwrap_or(Decimal::ZERO),
        }
    }
}

impl VersionComparator {
    pub fn new(significant_change_threshold: Decimal) -> Self {
        VersionComparator {
            significant_change_threshold,
        }
    }

    /// Diffs two snapshots. Holdings present in both with identical
    /// quantity and value are omitted entirely; a holding whose older value
    /// was zero and newer value nonzero is classified as added, since its
    /// percent change is undefined.
    pub fn compare(&self, older: &PortfolioSnapshot, newer: &PortfolioSnapshot) -> VersionDiff {
        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut changed = Vec::new();

        for holding in &newer.holdings {
            match older.holding(&holding.ticker) {
                None => added.push(holding.clone()),
                Some(old) => {
                    if old.quantity == holding.quantity && old.market_value == holding.market_value
                    {
                        continue;
                    }
                    if old.market_value == Decimal::ZERO && holding.market_value != Decimal::ZERO {
                        // No base to compute a percent against; effectively
                        // a new position.
                        added.push(holding.clone());
                        continue;
                    }
                    if old.market_value != Decimal::ZERO && holding.market_value == Decimal::ZERO {
                        // Inverse of the zero-base rule; the removed pass
                        // below picks this up, keeping the diff symmetric.
                        continue;
                    }

                    let value_delta = holding.market_value - old.market_value;
                    let (value_change_pct, significant) = if old.market_value == Decimal::ZERO {
                        (None, false)
                    } else {
                        let fraction = value_delta / old.market_value;
                        (
                            Some(fraction * Decimal::ONE_HUNDRED),
                            fraction.abs() > self.significant_change_threshold,
                        )
                    };

                    changed.push(HoldingChange {
                        ticker: holding.ticker.clone(),
                        old_quantity: old.quantity,
                        new_quantity: holding.quantity,
                        quantity_delta: holding.quantity - old.quantity,
                        old_value: old.market_value,
                        new_value: holding.market_value,
                        value_delta,
                        value_change_pct,
                        significant,
                    });
                }
            }
        }

        for holding in &older.holdings {
            match newer.holding(&holding.ticker) {
                None => removed.push(holding.clone()),
                // A position whose value fell to zero while staying listed
                // counts as removed.
                Some(new)
                    if new.market_value == Decimal::ZERO
                        && holding.market_value != Decimal::ZERO =>
                {
                    removed.push(holding.clone())
                }
                Some(_) => {}
            }
        }

        added.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        removed.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        changed.sort_by(|a, b| b.value_delta.abs().cmp(&a.value_delta.abs()));

        VersionDiff {
            older: older.snapshot_date,
            newer: newer.snapshot_date,
            added,
            removed,
            changed,
            total_value_delta: newer.total_value - older.total_value,
        }
    }

    /// Loads both date keys from a store and diffs them. A missing date
    /// surfaces as `SnapshotNotFound`; the store is left untouched.
    pub fn compare_stored(
        &self,
        store: &dyn VersionStoreTrait,
        older: NaiveDate,
        newer: NaiveDate,
    ) -> Result<VersionDiff> {
        let older_snapshot = store.load(older)?;
        let newer_snapshot = store.load(newer)?;
        Ok(self.compare(&older_snapshot, &newer_snapshot))
    }

    /// Diffs a stored date against the latest persisted snapshot.
    pub fn compare_with_latest(
        &self,
        store: &dyn VersionStoreTrait,
        older: NaiveDate,
    ) -> Result<VersionDiff> {
        let older_snapshot = store.load(older)?;
        let newer_snapshot = store.latest()?;
        Ok(self.compare(&older_snapshot, &newer_snapshot))
    }
}
