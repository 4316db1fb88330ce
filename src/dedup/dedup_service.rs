use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::{
    ConsolidatedHolding, DedupStrategy, DiscardReason, DiscardedHolding, DuplicateGroup,
    MergeOutcome, SourcePriority,
};
use crate::normalization::NormalizedHolding;

/// Collapses holdings that canonicalize to the same ticker across sources.
///
/// Grouping is keyed by canonical ticker in a BTreeMap, so the result set
/// is independent of input order; within a group, members keep their stable
/// input order for deterministic tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    strategy: DedupStrategy,
    priority: SourcePriority,
}

impl Deduplicator {
    pub fn new(strategy: DedupStrategy, priority: SourcePriority) -> Self {
        Deduplicator { strategy, priority }
    }

    pub fn strategy(&self) -> DedupStrategy {
        self.strategy
    }

    /// Partitions holdings by canonical ticker and merges each group per
    /// the configured strategy. Returns the fully collapsed holdings (one
    /// per ticker) and an audit group for every ticker that collided.
    pub fn deduplicate(
        &self,
        holdings: Vec<NormalizedHolding>,
    ) -> (Vec<ConsolidatedHolding>, Vec<DuplicateGroup>) {
        let mut groups: BTreeMap<String, Vec<NormalizedHolding>> = BTreeMap::new();
        for holding in holdings {
            groups.entry(holding.ticker.clone()).or_default().push(holding);
        }

        let mut consolidated = Vec::with_capacity(groups.len());
        let mut duplicates = Vec::new();

        for (ticker, members) in groups {
            if members.len() == 1 {
                consolidated.push(ConsolidatedHolding::from_holding(&members[0], self.strategy));
                continue;
            }

            debug!(
                "Ticker {} reported by {} records; merging with '{}' strategy",
                ticker,
                members.len(),
                self.strategy
            );

            let (merged, outcome) = match self.strategy {
                DedupStrategy::Aggregate => self.aggregate(&ticker, &members),
                DedupStrategy::Prioritize => self.keep_by_priority(&members),
                DedupStrategy::Latest => self.keep_latest(&members),
            };

            consolidated.push(merged);
            duplicates.push(DuplicateGroup {
                ticker,
                members,
                outcome,
            });
        }

        (consolidated, duplicates)
    }

    /// Sums quantities, values and profit/loss across all members; the
    /// average cost is quantity-weighted. Commutative and associative, so
    /// no value is created or destroyed and input order does not matter.
    fn aggregate(
        &self,
        ticker: &str,
        members: &[NormalizedHolding],
    ) -> (ConsolidatedHolding, MergeOutcome) {
        let total_quantity: Decimal = members.iter().map(|m| m.quantity).sum();
        let total_value: Decimal = members.iter().map(|m| m.market_value).sum();
        let total_profit_loss: Decimal = members.iter().map(|m| m.profit_loss).sum();
        let total_invested: Decimal = members.iter().map(|m| m.invested()).sum();

        let avg_cost = if total_quantity > Decimal::ZERO {
            total_invested / total_quantity
        } else {
            let cost_sum: Decimal = members.iter().map(|m| m.avg_cost).sum();
            cost_sum / Decimal::from(members.len())
        };

        let sources: Vec<String> = members.iter().map(|m| m.source.clone()).collect();

        let merged = ConsolidatedHolding::build(
            ticker.to_string(),
            total_quantity,
            avg_cost,
            total_value,
            total_profit_loss,
            sources.clone(),
            DedupStrategy::Aggregate,
        );
        let mut outcome_sources = sources;
        outcome_sources.sort();
        outcome_sources.dedup();

        (merged, MergeOutcome::Aggregated { sources: outcome_sources })
    }

    /// Keeps the member whose source ranks highest in the priority order;
    /// ties keep the first encountered in stable input order.
    fn keep_by_priority(&self, members: &[NormalizedHolding]) -> (ConsolidatedHolding, MergeOutcome) {
        let kept_idx = members
            .iter()
            .enumerate()
            .min_by_key(|(idx, m)| (self.priority.rank(&m.source), *idx))
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        self.keep_one(members, kept_idx, |kept| DiscardReason::LowerPriority {
            kept_source: kept.source.clone(),
        })
    }

    /// Keeps the member with the most recent as-of date, breaking date ties
    /// by priority order. A group with no as-of dates at all falls back to
    /// priority selection.
    fn keep_latest(&self, members: &[NormalizedHolding]) -> (ConsolidatedHolding, MergeOutcome) {
        let kept = members
            .iter()
            .enumerate()
            .filter_map(|(idx, m)| m.as_of.map(|date| (idx, date, m)))
            // Newest date first, then priority, then stable input order.
            .min_by_key(|(idx, date, m)| {
                (std::cmp::Reverse(*date), self.priority.rank(&m.source), *idx)
            });

        match kept {
            Some((idx, kept_as_of, _)) => {
                self.keep_one(members, idx, move |_| DiscardReason::StaleAsOf { kept_as_of })
            }
            None => self.keep_by_priority(members),
        }
    }

    fn keep_one<F>(
        &self,
        members: &[NormalizedHolding],
        kept_idx: usize,
        reason: F,
    ) -> (ConsolidatedHolding, MergeOutcome)
    where
        F: Fn(&NormalizedHolding) -> DiscardReason,
    {
        let kept = &members[kept_idx];
        let discarded: Vec<DiscardedHolding> = members
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != kept_idx)
            .map(|(_, m)| DiscardedHolding {
                holding: m.clone(),
                reason: reason(kept),
            })
            .collect();

        (
            ConsolidatedHolding::from_holding(kept, self.strategy),
            MergeOutcome::Kept {
                source: kept.source.clone(),
                discarded,
            },
        )
    }
}
