use log::debug;

use super::{
    parse_locale_decimal, AliasResolution, AliasTable, NormalizationWarning, NormalizedHolding,
    RawHoldingRecord,
};
use crate::errors::ParseError;

/// Canonicalizes raw per-source records into `NormalizedHolding`s.
///
/// Pure transformation: the same record under the same alias table always
/// yields the same result. Pass-through tickers are reported as audit
/// warnings, never as errors; malformed numeric fields are `ParseError`s
/// scoped to the one record.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    alias_table: AliasTable,
}

impl Normalizer {
    pub fn new(alias_table: AliasTable) -> Self {
        Normalizer { alias_table }
    }

    pub fn normalize(
        &self,
        raw: &RawHoldingRecord,
    ) -> Result<(NormalizedHolding, Option<NormalizationWarning>), ParseError> {
        let resolution = self.alias_table.resolve(&raw.label);

        let quantity = parse_locale_decimal(&raw.quantity)?;
        let avg_cost = parse_locale_decimal(&raw.unit_price)?;
        let market_value = parse_locale_decimal(&raw.current_value)?;

        // Sources that do not report profit/loss get it derived from the
        // cost basis.
        let profit_loss = match &raw.profit_loss {
            Some(pl) => parse_locale_decimal(pl)?,
            None => market_value - avg_cost * quantity,
        };

        let warning = match &resolution {
            AliasResolution::Canonical(_) => None,
            AliasResolution::PassThrough(ticker) => {
                debug!(
                    "No alias for label '{}' from {}; passing through as '{}'",
                    raw.label, raw.source, ticker
                );
                Some(NormalizationWarning::UnknownTicker {
                    source: raw.source.clone(),
                    label: raw.label.clone(),
                    ticker: ticker.clone(),
                })
            }
        };

        let holding = NormalizedHolding {
            source: raw.source.clone(),
            ticker: resolution.ticker().to_string(),
            label: raw.label.trim().to_string(),
            quantity,
            avg_cost,
            market_value,
            profit_loss,
            as_of: raw.as_of,
        };

        Ok((holding, warning))
    }

    pub fn alias_table(&self) -> &AliasTable {
        &self.alias_table
    }
}
