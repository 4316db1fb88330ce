use super::*;
use crate::normalization::NormalizedHolding;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn holding(source: &str, ticker: &str, quantity: Decimal, market_value: Decimal) -> NormalizedHolding {
    NormalizedHolding {
        source: source.to_string(),
        ticker: ticker.to_string(),
        label: ticker.to_string(),
        quantity,
        avg_cost: dec!(10),
        market_value,
        profit_loss: market_value - dec!(10) * quantity,
        as_of: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn empty_input_yields_empty_output() {
    let dedup = Deduplicator::default();
    let (consolidated, duplicates) = dedup.deduplicate(Vec::new());
    assert!(consolidated.is_empty());
    assert!(duplicates.is_empty());
}

#[test]
fn singletons_pass_through_without_duplicate_groups() {
    let dedup = Deduplicator::default();
    let (consolidated, duplicates) = dedup.deduplicate(vec![
        holding("B3", "PETR4", dec!(100), dec!(2850)),
        holding("XP", "VALE3", dec!(50), dec!(3000)),
    ]);

    assert_eq!(consolidated.len(), 2);
    assert!(duplicates.is_empty());
    assert_eq!(consolidated[0].sources, vec!["B3".to_string()]);
}

#[test]
fn aggregate_sums_quantities_and_values() {
    // Two sources report the same ticker with quantities 100 and 50.
    let dedup = Deduplicator::new(DedupStrategy::Aggregate, SourcePriority::default());
    let (consolidated, duplicates) = dedup.deduplicate(vec![
        holding("B3", "XYZ3", dec!(100), dec!(1500)),
        holding("Kinvo", "XYZ3", dec!(50), dec!(750)),
    ]);

    assert_eq!(consolidated.len(), 1);
    let merged = &consolidated[0];
    assert_eq!(merged.quantity, dec!(150));
    assert_eq!(merged.market_value, dec!(2250));
    assert_eq!(merged.sources, vec!["B3".to_string(), "Kinvo".to_string()]);

    assert_eq!(duplicates.len(), 1);
    assert!(matches!(
        duplicates[0].outcome,
        MergeOutcome::Aggregated { ref sources } if sources.len() == 2
    ));
}

#[test]
fn aggregate_conserves_profit_loss() {
    let dedup = Deduplicator::default();
    let members = vec![
        holding("B3", "XYZ3", dec!(100), dec!(1500)),
        holding("XP", "XYZ3", dec!(50), dec!(750)),
        holding("Kinvo", "XYZ3", dec!(25), dec!(400)),
    ];
    let expected_pl: Decimal = members.iter().map(|m| m.profit_loss).sum();

    let (consolidated, _) = dedup.deduplicate(members);
    assert_eq!(consolidated[0].profit_loss, expected_pl);
}

#[test]
fn aggregate_weighted_avg_cost() {
    let mut a = holding("B3", "XYZ3", dec!(100), dec!(1500));
    a.avg_cost = dec!(10);
    let mut b = holding("XP", "XYZ3", dec!(50), dec!(750));
    b.avg_cost = dec!(16);

    let dedup = Deduplicator::default();
    let (consolidated, _) = dedup.deduplicate(vec![a, b]);

    // (10*100 + 16*50) / 150 = 12
    assert_eq!(consolidated[0].avg_cost, dec!(12));
}

#[test]
fn aggregate_is_order_independent() {
    let a = holding("B3", "XYZ3", dec!(100), dec!(1500));
    let b = holding("Kinvo", "XYZ3", dec!(50), dec!(750));
    let c = holding("XP", "ABCD11", dec!(10), dec!(900));

    let dedup = Deduplicator::default();
    let (forward, _) = dedup.deduplicate(vec![a.clone(), b.clone(), c.clone()]);
    let (reversed, _) = dedup.deduplicate(vec![c, b, a]);

    assert_eq!(forward, reversed);
}

#[test]
fn prioritize_keeps_highest_priority_source() {
    // Ticker reported by both B3 and Kinvo: B3 wins, Kinvo is discarded.
    let dedup = Deduplicator::new(DedupStrategy::Prioritize, SourcePriority::default());
    let (consolidated, duplicates) = dedup.deduplicate(vec![
        holding("Kinvo", "XYZ3", dec!(50), dec!(750)),
        holding("B3", "XYZ3", dec!(100), dec!(1500)),
    ]);

    assert_eq!(consolidated.len(), 1);
    assert_eq!(consolidated[0].quantity, dec!(100));
    assert_eq!(consolidated[0].sources, vec!["B3".to_string()]);

    match &duplicates[0].outcome {
        MergeOutcome::Kept { source, discarded } => {
            assert_eq!(source, "B3");
            assert_eq!(discarded.len(), 1);
            assert_eq!(discarded[0].holding.source, "Kinvo");
            assert!(matches!(
                discarded[0].reason,
                DiscardReason::LowerPriority { ref kept_source } if kept_source == "B3"
            ));
        }
        other => panic!("expected Kept outcome, got {:?}", other),
    }
}

#[test]
fn prioritize_breaks_same_source_ties_by_input_order() {
    let dedup = Deduplicator::new(DedupStrategy::Prioritize, SourcePriority::default());
    let first = holding("B3", "XYZ3", dec!(100), dec!(1500));
    let second = holding("B3", "XYZ3", dec!(40), dec!(600));

    let (consolidated, _) = dedup.deduplicate(vec![first, second]);
    assert_eq!(consolidated[0].quantity, dec!(100));
}

#[test]
fn latest_keeps_most_recent_as_of() {
    let mut older = holding("MyProfit", "XYZ3", dec!(100), dec!(1500));
    older.as_of = Some(date(2025, 9, 20));
    let mut newer = holding("Kinvo", "XYZ3", dec!(90), dec!(1400));
    newer.as_of = Some(date(2025, 9, 28));

    let dedup = Deduplicator::new(DedupStrategy::Latest, SourcePriority::default());
    let (consolidated, duplicates) = dedup.deduplicate(vec![older, newer]);

    assert_eq!(consolidated[0].sources, vec!["Kinvo".to_string()]);
    match &duplicates[0].outcome {
        MergeOutcome::Kept { discarded, .. } => {
            assert!(matches!(
                discarded[0].reason,
                DiscardReason::StaleAsOf { kept_as_of } if kept_as_of == date(2025, 9, 28)
            ));
        }
        other => panic!("expected Kept outcome, got {:?}", other),
    }
}

#[test]
fn latest_breaks_date_ties_by_priority() {
    let mut a = holding("XP", "XYZ3", dec!(100), dec!(1500));
    a.as_of = Some(date(2025, 9, 28));
    let mut b = holding("B3", "XYZ3", dec!(90), dec!(1400));
    b.as_of = Some(date(2025, 9, 28));

    let dedup = Deduplicator::new(DedupStrategy::Latest, SourcePriority::default());
    let (consolidated, _) = dedup.deduplicate(vec![a, b]);

    assert_eq!(consolidated[0].sources, vec!["B3".to_string()]);
}

#[test]
fn latest_without_dates_falls_back_to_priority() {
    let dedup = Deduplicator::new(DedupStrategy::Latest, SourcePriority::default());
    let (consolidated, _) = dedup.deduplicate(vec![
        holding("Kinvo", "XYZ3", dec!(50), dec!(750)),
        holding("XP", "XYZ3", dec!(100), dec!(1500)),
    ]);

    assert_eq!(consolidated[0].sources, vec!["XP".to_string()]);
}
