use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::dedup::{ConsolidatedHolding, DedupStrategy, DuplicateGroup, SourcePriority};
use crate::errors::ConfigError;
use crate::normalization::{AliasTable, NormalizationWarning};
use crate::utils::decimal_serde::decimal_serde;

/// Explicit configuration for one consolidation run. Threaded into the
/// `Consolidator` rather than read from ambient state, so runs cannot
/// interfere with each other.
#[derive(Debug, Clone, Default)]
pub struct ConsolidationConfig {
    pub strategy: DedupStrategy,
    pub priority: SourcePriority,
    pub alias_table: AliasTable,
}

impl ConsolidationConfig {
    /// Builds a config from a strategy name, failing fast on an unknown
    /// value before any record is processed.
    pub fn with_strategy_name(strategy: &str) -> Result<Self, ConfigError> {
        Ok(ConsolidationConfig {
            strategy: DedupStrategy::from_str(strategy)?,
            ..Default::default()
        })
    }
}

/// Per-source contribution to a snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub holdings: usize,
    #[serde(with = "decimal_serde")]
    pub market_value: Decimal,
}

/// The consolidated portfolio at one date. Immutable after construction;
/// re-running a day's consolidation produces a new snapshot that replaces
/// the stored one under the same date key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub snapshot_date: NaiveDate,
    /// Holdings sorted by descending market value, ties broken by ticker.
    /// Canonical tickers are unique within one snapshot.
    pub holdings: Vec<ConsolidatedHolding>,
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_invested: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_profit_loss: Decimal,
    pub holding_count: usize,
    pub source_summaries: BTreeMap<String, SourceSummary>,
    pub strategy: DedupStrategy,
    pub calculated_at: NaiveDateTime,
}

impl PortfolioSnapshot {
    pub fn holding(&self, ticker: &str) -> Option<&ConsolidatedHolding> {
        self.holdings.iter().find(|h| h.ticker == ticker)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Content equality ignoring the creation timestamp; two runs over the
    /// same inputs compare equal under this even though `calculated_at`
    /// differs.
    pub fn same_contents(&self, other: &PortfolioSnapshot) -> bool {
        self.snapshot_date == other.snapshot_date
            && self.holdings == other.holdings
            && self.total_value == other.total_value
            && self.total_invested == other.total_invested
            && self.total_profit_loss == other.total_profit_loss
            && self.source_summaries == other.source_summaries
            && self.strategy == other.strategy
    }
}

/// Non-fatal conditions surfaced alongside a consolidation result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ConsolidationWarning {
    /// An entire source contributed nothing (adapter failure, or every
    /// record unparseable).
    SourceSkipped { source: String, reason: String },
    /// One record was dropped; the rest of its source was processed.
    RecordDropped {
        source: String,
        label: String,
        reason: String,
    },
    /// A label matched no alias and passed through as its own ticker.
    UnknownTicker {
        source: String,
        label: String,
        ticker: String,
    },
}

impl From<NormalizationWarning> for ConsolidationWarning {
    fn from(warning: NormalizationWarning) -> Self {
        match warning {
            NormalizationWarning::UnknownTicker {
                source,
                label,
                ticker,
            } => ConsolidationWarning::UnknownTicker {
                source,
                label,
                ticker,
            },
        }
    }
}

/// Everything one consolidation run produces: the snapshot itself, the
/// duplicate-collision audit trail and the warning list.
#[derive(Debug, Clone)]
pub struct ConsolidationOutcome {
    pub snapshot: PortfolioSnapshot,
    pub duplicates: Vec<DuplicateGroup>,
    pub warnings: Vec<ConsolidationWarning>,
}

impl ConsolidationOutcome {
    pub fn skipped_sources(&self) -> Vec<&str> {
        self.warnings
            .iter()
            .filter_map(|w| match w {
                ConsolidationWarning::SourceSkipped { source, .. } => Some(source.as_str()),
                _ => None,
            })
            .collect()
    }
}
