use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"20\d{2}").unwrap();
}

/// Outcome of resolving a raw label to its canonical ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum AliasResolution {
    /// The label matched an alias entry or a bond family rule.
    Canonical(String),
    /// No match; the uppercased/trimmed label is used as-is.
    PassThrough(String),
}

impl AliasResolution {
    pub fn ticker(&self) -> &str {
        match self {
            AliasResolution::Canonical(t) | AliasResolution::PassThrough(t) => t,
        }
    }
}

/// Injected mapping from raw instrument labels to canonical tickers.
///
/// Resolution is a pure function of the label: uppercase and trim, strip
/// configured broker suffixes, collapse Tesouro Direto family labels, then
/// look up the exact alias entry. The table is plain versionable data and
/// is serializable so it can be loaded from configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AliasTable {
    /// Exact-match aliases, keyed by uppercased/trimmed label.
    #[serde(default)]
    aliases: HashMap<String, String>,
    /// Broker-specific suffixes stripped from the end of a label.
    #[serde(default)]
    suffixes: Vec<String>,
}

impl AliasTable {
    pub fn new(aliases: HashMap<String, String>, suffixes: Vec<String>) -> Self {
        let aliases = aliases
            .into_iter()
            .map(|(k, v)| (k.trim().to_uppercase(), v.trim().to_uppercase()))
            .collect();
        let suffixes = suffixes
            .into_iter()
            .map(|s| s.trim().to_uppercase())
            .collect();
        AliasTable { aliases, suffixes }
    }

    /// Table pre-loaded for Brazilian exports: strips the fractional-market
    /// marker brokers append to listed tickers.
    pub fn brazilian_defaults() -> Self {
        AliasTable::new(
            HashMap::new(),
            vec![
                " - FRACIONARIO".to_string(),
                " - FRACIONÁRIO".to_string(),
            ],
        )
    }

    pub fn insert_alias(&mut self, label: impl Into<String>, canonical: impl Into<String>) {
        self.aliases.insert(
            label.into().trim().to_uppercase(),
            canonical.into().trim().to_uppercase(),
        );
    }

    /// Resolves a raw label to its canonical ticker.
    pub fn resolve(&self, label: &str) -> AliasResolution {
        let mut normalized = label.trim().to_uppercase();

        for suffix in &self.suffixes {
            if let Some(stripped) = normalized.strip_suffix(suffix.as_str()) {
                let stripped = stripped.trim();
                if !stripped.is_empty() {
                    normalized = stripped.to_string();
                }
            }
        }

        // Tesouro Direto titles come in wildly different spellings across
        // sources; collapse each family to one class code, keeping the
        // maturity year when present.
        if normalized.contains("TESOURO") {
            for family in ["SELIC", "IPCA", "PREFIXADO"] {
                if normalized.contains(family) {
                    let canonical = match YEAR_RE.find(&normalized) {
                        Some(year) => format!("TESOURO {} {}", family, year.as_str()),
                        None => format!("TESOURO {}", family),
                    };
                    return AliasResolution::Canonical(canonical);
                }
            }
        }

        match self.aliases.get(&normalized) {
            Some(canonical) => AliasResolution::Canonical(canonical.clone()),
            None => AliasResolution::PassThrough(normalized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_uppercases_and_trims() {
        let table = AliasTable::default();
        assert_eq!(
            table.resolve("  petr4 "),
            AliasResolution::PassThrough("PETR4".to_string())
        );
    }

    #[test]
    fn resolve_collapses_tesouro_selic_with_year() {
        let table = AliasTable::default();
        assert_eq!(
            table.resolve("Tesouro Selic 2029 (LFT)"),
            AliasResolution::Canonical("TESOURO SELIC 2029".to_string())
        );
        assert_eq!(
            table.resolve("TESOURO SELIC"),
            AliasResolution::Canonical("TESOURO SELIC".to_string())
        );
    }

    #[test]
    fn resolve_collapses_tesouro_ipca_variants_to_same_ticker() {
        let table = AliasTable::default();
        let a = table.resolve("Tesouro IPCA+ 2035");
        let b = table.resolve("TESOURO IPCA 2035 - NTN-B PRINC");
        assert_eq!(a, b);
        assert_eq!(a, AliasResolution::Canonical("TESOURO IPCA 2035".to_string()));
    }

    #[test]
    fn resolve_is_deterministic() {
        let table = AliasTable::brazilian_defaults();
        let first = table.resolve("tesouro prefixado 2031");
        let second = table.resolve("tesouro prefixado 2031");
        assert_eq!(first, second);
    }

    #[test]
    fn resolve_strips_configured_suffixes() {
        let table = AliasTable::brazilian_defaults();
        assert_eq!(
            table.resolve("VALE3 - Fracionário"),
            AliasResolution::PassThrough("VALE3".to_string())
        );
    }

    #[test]
    fn resolve_uses_alias_entries() {
        let mut table = AliasTable::default();
        table.insert_alias("Itausa Pref", "ITSA4");
        assert_eq!(
            table.resolve("itausa pref"),
            AliasResolution::Canonical("ITSA4".to_string())
        );
    }
}
