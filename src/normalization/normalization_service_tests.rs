use super::*;
use crate::errors::ParseError;
use rust_decimal_macros::dec;

fn normalizer() -> Normalizer {
    Normalizer::new(AliasTable::brazilian_defaults())
}

#[test]
fn normalizes_brazilian_currency_fields() {
    let raw = RawHoldingRecord::new("B3", "PETR4", "100", "R$ 28,50", "R$ 1.234,56");
    let (holding, _) = normalizer().normalize(&raw).unwrap();

    assert_eq!(holding.ticker, "PETR4");
    assert_eq!(holding.quantity, dec!(100));
    assert_eq!(holding.avg_cost, dec!(28.50));
    assert_eq!(holding.market_value, dec!(1234.56));
}

#[test]
fn derives_profit_loss_when_absent() {
    let raw = RawHoldingRecord::new("XP", "VALE3", "10", "R$ 60,00", "R$ 650,00");
    let (holding, _) = normalizer().normalize(&raw).unwrap();

    // 650 - 60 * 10
    assert_eq!(holding.profit_loss, dec!(50.00));
}

#[test]
fn uses_reported_profit_loss_when_present() {
    let raw = RawHoldingRecord::new("MyProfit", "VALE3", "10", "R$ 60,00", "R$ 650,00")
        .with_profit_loss("R$ 49,90");
    let (holding, _) = normalizer().normalize(&raw).unwrap();

    assert_eq!(holding.profit_loss, dec!(49.90));
}

#[test]
fn malformed_numeric_field_is_a_parse_error() {
    let raw = RawHoldingRecord::new("Kinvo", "CDB Banco X", "1", "abc", "R$ 100,00");
    let err = normalizer().normalize(&raw).unwrap_err();

    assert!(matches!(err, ParseError::InvalidNumber(s) if s == "abc"));
}

#[test]
fn unknown_label_passes_through_with_warning() {
    let raw = RawHoldingRecord::new("Kinvo", "  cdb banco x 2027 ", "1", "0", "R$ 100,00");
    let (holding, warning) = normalizer().normalize(&raw).unwrap();

    assert_eq!(holding.ticker, "CDB BANCO X 2027");
    assert!(matches!(
        warning,
        Some(NormalizationWarning::UnknownTicker { ref ticker, .. }) if ticker == "CDB BANCO X 2027"
    ));
}

#[test]
fn alias_and_family_hits_do_not_warn() {
    let raw = RawHoldingRecord::new("Kinvo", "Tesouro Selic 2029", "1", "0", "R$ 100,00");
    let (holding, warning) = normalizer().normalize(&raw).unwrap();

    assert_eq!(holding.ticker, "TESOURO SELIC 2029");
    assert!(warning.is_none());
}

#[test]
fn normalization_is_deterministic() {
    let raw = RawHoldingRecord::new("B3", "Tesouro IPCA+ 2035", "2", "R$ 3.100,00", "R$ 6.400,00");
    let n = normalizer();
    let (first, _) = n.normalize(&raw).unwrap();
    let (second, _) = n.normalize(&raw).unwrap();

    assert_eq!(first, second);
}
