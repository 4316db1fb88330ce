use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dedup::ConsolidatedHolding;
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

/// One holding present in both snapshots whose quantity or value moved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingChange {
    pub ticker: String,
    #[serde(with = "decimal_serde")]
    pub old_quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub new_quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub quantity_delta: Decimal,
    #[serde(with = "decimal_serde")]
    pub old_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub new_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub value_delta: Decimal,
    /// Percent change of market value (delta over old value, x100).
    /// `None` when the old value was zero.
    #[serde(with = "decimal_serde_option")]
    pub value_change_pct: Option<Decimal>,
    /// Whether the relative move exceeds the comparator's threshold.
    pub significant: bool,
}

/// Structured difference between two snapshots. Unchanged holdings are
/// omitted, so the diff scales with actual change, not portfolio size.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionDiff {
    pub older: NaiveDate,
    pub newer: NaiveDate,
    /// Present only in the newer snapshot, sorted by ticker. Includes
    /// holdings whose older value was zero (a percent change would be
    /// undefined for those).
    pub added: Vec<ConsolidatedHolding>,
    /// Present only in the older snapshot, sorted by ticker.
    pub removed: Vec<ConsolidatedHolding>,
    /// Sorted by absolute value delta, largest first.
    pub changed: Vec<HoldingChange>,
    #[serde(with = "decimal_serde")]
    pub total_value_delta: Decimal,
}

impl VersionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Listing entry for one persisted snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub date: NaiveDate,
    pub holding_count: usize,
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
}
