use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::ParseError;

lazy_static! {
    // Matches an optionally signed number in Brazilian formatting:
    // dot-separated thousands groups, comma decimal part.
    static ref NUMERIC_RE: Regex = Regex::new(r"-?\d+(?:\.\d{3})*(?:,\d+)?").unwrap();
}

/// Parses a Brazilian-locale currency or quantity string into an exact
/// decimal: "R$ 1.234,56" -> 1234.56. Dots are thousands separators, the
/// comma is the decimal separator. Fails when the string contains no
/// recognizable numeric pattern.
pub fn parse_locale_decimal(input: &str) -> Result<Decimal, ParseError> {
    // Drop the currency symbol and any interior whitespace so a detached
    // sign ("- 12,34") still parses as signed.
    let cleaned: String = input
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let matched = NUMERIC_RE
        .find(&cleaned)
        .ok_or_else(|| ParseError::InvalidNumber(input.to_string()))?;

    let normalized = matched.as_str().replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| ParseError::InvalidNumber(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_currency_with_symbol_and_separators() {
        assert_eq!(parse_locale_decimal("R$ 1.234,56").unwrap(), dec!(1234.56));
    }

    #[test]
    fn parses_plain_integer() {
        assert_eq!(parse_locale_decimal("100").unwrap(), dec!(100));
    }

    #[test]
    fn parses_comma_decimal_without_thousands() {
        assert_eq!(parse_locale_decimal("0,5").unwrap(), dec!(0.5));
    }

    #[test]
    fn parses_negative_amounts() {
        assert_eq!(parse_locale_decimal("-R$ 12,34").unwrap(), dec!(-12.34));
        assert_eq!(parse_locale_decimal("R$ -1.000,00").unwrap(), dec!(-1000.00));
    }

    #[test]
    fn parses_large_amounts_with_multiple_groups() {
        assert_eq!(
            parse_locale_decimal("R$ 1.234.567,89").unwrap(),
            dec!(1234567.89)
        );
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!(matches!(
            parse_locale_decimal("abc"),
            Err(ParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_locale_decimal(""),
            Err(ParseError::InvalidNumber(_))
        ));
    }
}
