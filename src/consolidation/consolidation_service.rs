use chrono::{NaiveDate, Utc};
use log::{info, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

use super::{
    ConsolidationConfig, ConsolidationOutcome, ConsolidationWarning, PortfolioSnapshot,
    SourceSummary,
};
use crate::dedup::Deduplicator;
use crate::normalization::{NormalizedHolding, Normalizer, RawHoldingRecord};

/// Orchestrates one consolidation run: per-source normalization, cross-
/// source deduplication, aggregate metrics and snapshot construction.
///
/// Partial failure is tolerated, not fatal: a malformed record is dropped
/// and logged, a dead source is skipped and reported, and even a run where
/// every source fails still yields an empty snapshot plus warnings.
#[derive(Debug, Clone, Default)]
pub struct Consolidator {
    normalizer: Normalizer,
    deduplicator: Deduplicator,
}

impl Consolidator {
    pub fn new(config: ConsolidationConfig) -> Self {
        Consolidator {
            normalizer: Normalizer::new(config.alias_table),
            deduplicator: Deduplicator::new(config.strategy, config.priority),
        }
    }

    /// Consolidates raw records grouped by source into a snapshot keyed by
    /// `as_of`, or by today when none is supplied.
    pub fn consolidate(
        &self,
        per_source: BTreeMap<String, Vec<RawHoldingRecord>>,
        as_of: Option<NaiveDate>,
    ) -> ConsolidationOutcome {
        let mut warnings: Vec<ConsolidationWarning> = Vec::new();
        let mut normalized: Vec<NormalizedHolding> = Vec::new();

        for (source, records) in per_source {
            if records.is_empty() {
                warn!("Source {} produced no records; skipping", source);
                warnings.push(ConsolidationWarning::SourceSkipped {
                    source,
                    reason: "source produced no records".to_string(),
                });
                continue;
            }

            let record_count = records.len();
            let mut kept = 0usize;

            for record in records {
                match self.normalizer.normalize(&record) {
                    Ok((holding, warning)) => {
                        if let Some(w) = warning {
                            let w = ConsolidationWarning::from(w);
                            if !warnings.contains(&w) {
                                warnings.push(w);
                            }
                        }
                        normalized.push(holding);
                        kept += 1;
                    }
                    Err(err) => {
                        warn!(
                            "Dropping record '{}' from {}: {}",
                            record.label, record.source, err
                        );
                        warnings.push(ConsolidationWarning::RecordDropped {
                            source: record.source.clone(),
                            label: record.label.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }

            if kept == 0 {
                warnings.push(ConsolidationWarning::SourceSkipped {
                    source,
                    reason: format!("all {} records failed to parse", record_count),
                });
            }
        }

        self.build_outcome(normalized, warnings, as_of)
    }

    /// Like `consolidate`, but accepts per-source adapter results so an
    /// adapter failure becomes a skipped-source warning instead of aborting
    /// the run.
    pub fn consolidate_sources<E: fmt::Display>(
        &self,
        per_source: BTreeMap<String, Result<Vec<RawHoldingRecord>, E>>,
        as_of: Option<NaiveDate>,
    ) -> ConsolidationOutcome {
        let mut readable = BTreeMap::new();
        let mut adapter_warnings = Vec::new();

        for (source, result) in per_source {
            match result {
                Ok(records) => {
                    readable.insert(source, records);
                }
                Err(err) => {
                    warn!("Source {} failed: {}; skipping", source, err);
                    adapter_warnings.push(ConsolidationWarning::SourceSkipped {
                        source,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let mut outcome = self.consolidate(readable, as_of);
        outcome.warnings.splice(0..0, adapter_warnings);
        outcome
    }

    fn build_outcome(
        &self,
        normalized: Vec<NormalizedHolding>,
        warnings: Vec<ConsolidationWarning>,
        as_of: Option<NaiveDate>,
    ) -> ConsolidationOutcome {
        let mut source_summaries: BTreeMap<String, SourceSummary> = BTreeMap::new();
        for holding in &normalized {
            let summary = source_summaries
                .entry(holding.source.clone())
                .or_insert(SourceSummary {
                    holdings: 0,
                    market_value: Decimal::ZERO,
                });
            summary.holdings += 1;
            summary.market_value += holding.market_value;
        }

        let (mut holdings, duplicates) = self.deduplicator.deduplicate(normalized);

        // Descending market value for display; ticker tie-break keeps the
        // ordering deterministic.
        holdings.sort_by(|a, b| {
            b.market_value
                .cmp(&a.market_value)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });

        let total_value: Decimal = holdings.iter().map(|h| h.market_value).sum();
        let total_invested: Decimal = holdings.iter().map(|h| h.invested()).sum();
        let total_profit_loss: Decimal = holdings.iter().map(|h| h.profit_loss).sum();

        let snapshot = PortfolioSnapshot {
            snapshot_date: as_of.unwrap_or_else(|| Utc::now().date_naive()),
            holding_count: holdings.len(),
            holdings,
            total_value,
            total_invested,
            total_profit_loss,
            source_summaries,
            strategy: self.deduplicator.strategy(),
            calculated_at: Utc::now().naive_utc(),
        };

        info!(
            "Consolidated {} holdings across {} sources for {} ({} duplicate groups, {} warnings)",
            snapshot.holding_count,
            snapshot.source_summaries.len(),
            snapshot.snapshot_date,
            duplicates.len(),
            warnings.len()
        );

        ConsolidationOutcome {
            snapshot,
            duplicates,
            warnings,
        }
    }
}
