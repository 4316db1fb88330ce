use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::decimal_serde;

/// One holding as reported by a single source adapter, before any
/// canonicalization. Numeric fields are kept as the raw locale-formatted
/// strings the adapter extracted (e.g. "R$ 1.234,56").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawHoldingRecord {
    pub source: String,
    pub label: String,
    pub quantity: String,
    pub unit_price: String,
    pub current_value: String,
    pub profit_loss: Option<String>,
    pub as_of: Option<NaiveDate>,
}

impl RawHoldingRecord {
    pub fn new(
        source: impl Into<String>,
        label: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
        current_value: impl Into<String>,
    ) -> Self {
        RawHoldingRecord {
            source: source.into(),
            label: label.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            current_value: current_value.into(),
            profit_loss: None,
            as_of: None,
        }
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn with_profit_loss(mut self, profit_loss: impl Into<String>) -> Self {
        self.profit_loss = Some(profit_loss.into());
        self
    }
}

/// Canonical form of a holding. Derived one-to-one from a
/// `RawHoldingRecord`; the original label is kept for audit reporting.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedHolding {
    pub source: String,
    pub ticker: String,
    pub label: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub avg_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub market_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub profit_loss: Decimal,
    pub as_of: Option<NaiveDate>,
}

impl NormalizedHolding {
    /// Capital invested in this holding (cost basis).
    pub fn invested(&self) -> Decimal {
        self.avg_cost * self.quantity
    }
}

/// Audit signal emitted during normalization. Warnings are collected and
/// surfaced alongside results, never raised as errors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum NormalizationWarning {
    /// The label matched no alias or family rule and passed through as its
    /// own canonical ticker.
    UnknownTicker {
        source: String,
        label: String,
        ticker: String,
    },
}
