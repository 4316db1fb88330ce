use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DECIMAL_PRECISION, DEFAULT_SOURCE_PRIORITY};
use crate::errors::ConfigError;
use crate::normalization::NormalizedHolding;
use crate::utils::decimal_serde::decimal_serde;

/// How duplicate holdings across sources are merged. A closed set: an
/// out-of-set configuration string is rejected at parse time, before any
/// processing begins.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DedupStrategy {
    /// Sum quantities and values from all sources (default).
    #[default]
    Aggregate,
    /// Keep the record from the highest-priority source verbatim.
    Prioritize,
    /// Keep the record with the most recent as-of date.
    Latest,
}

impl FromStr for DedupStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aggregate" => Ok(DedupStrategy::Aggregate),
            "prioritize" => Ok(DedupStrategy::Prioritize),
            "latest" => Ok(DedupStrategy::Latest),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupStrategy::Aggregate => write!(f, "aggregate"),
            DedupStrategy::Prioritize => write!(f, "prioritize"),
            DedupStrategy::Latest => write!(f, "latest"),
        }
    }
}

/// Ordered list of source names, most trusted first. Sources absent from
/// the list rank below every listed one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourcePriority {
    order: Vec<String>,
}

impl Default for SourcePriority {
    fn default() -> Self {
        SourcePriority {
            order: DEFAULT_SOURCE_PRIORITY
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SourcePriority {
    pub fn new(order: Vec<String>) -> Self {
        SourcePriority { order }
    }

    /// Rank of a source; lower is more trusted.
    pub fn rank(&self, source: &str) -> usize {
        self.order
            .iter()
            .position(|s| s == source)
            .unwrap_or(self.order.len())
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }
}

/// One holding in the consolidated view, after duplicates across sources
/// collapsed per the configured strategy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedHolding {
    pub ticker: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub market_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub profit_loss: Decimal,
    #[serde(with = "decimal_serde")]
    pub profit_loss_pct: Decimal,
    /// Contributing source names, sorted.
    pub sources: Vec<String>,
    pub strategy: DedupStrategy,
}

impl ConsolidatedHolding {
    /// Builds a consolidated holding from a single surviving record.
    pub fn from_holding(holding: &NormalizedHolding, strategy: DedupStrategy) -> Self {
        Self::build(
            holding.ticker.clone(),
            holding.quantity,
            holding.avg_cost,
            holding.market_value,
            holding.profit_loss,
            vec![holding.source.clone()],
            strategy,
        )
    }

    pub fn build(
        ticker: String,
        quantity: Decimal,
        avg_cost: Decimal,
        market_value: Decimal,
        profit_loss: Decimal,
        mut sources: Vec<String>,
        strategy: DedupStrategy,
    ) -> Self {
        sources.sort();
        sources.dedup();
        // Computed fields are rounded here so persisting a snapshot (which
        // serializes at the same precision) stays lossless.
        let avg_cost = avg_cost.round_dp(DECIMAL_PRECISION);
        let invested = avg_cost * quantity;
        let profit_loss_pct = if invested > Decimal::ZERO {
            (profit_loss / invested * Decimal::ONE_HUNDRED).round_dp(DECIMAL_PRECISION)
        } else {
            Decimal::ZERO
        };
        ConsolidatedHolding {
            ticker,
            quantity,
            avg_cost,
            market_value,
            profit_loss,
            profit_loss_pct,
            sources,
            strategy,
        }
    }

    pub fn invested(&self) -> Decimal {
        self.avg_cost * self.quantity
    }
}

/// Why a colliding record was left out of the consolidated totals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum DiscardReason {
    /// A higher-priority source reported the same ticker.
    LowerPriority { kept_source: String },
    /// A more recent record for the same ticker exists.
    StaleAsOf { kept_as_of: NaiveDate },
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardReason::LowerPriority { kept_source } => {
                write!(f, "superseded by higher-priority source {}", kept_source)
            }
            DiscardReason::StaleAsOf { kept_as_of } => {
                write!(f, "superseded by record as of {}", kept_as_of)
            }
        }
    }
}

/// A record excluded from totals by a keep-one strategy, with the reason.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscardedHolding {
    pub holding: NormalizedHolding,
    pub reason: DiscardReason,
}

/// What the strategy did with a colliding group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum MergeOutcome {
    /// All members contributed to the totals.
    Aggregated { sources: Vec<String> },
    /// One member was kept verbatim; the rest were discarded.
    Kept {
        source: String,
        discarded: Vec<DiscardedHolding>,
    },
}

/// Audit record for one canonical ticker reported by several records.
/// Ephemeral output of a consolidation run, not persisted portfolio state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub ticker: String,
    pub members: Vec<NormalizedHolding>,
    pub outcome: MergeOutcome,
}
