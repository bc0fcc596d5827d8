use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a command-line amount into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is an error.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    normalize_decimal_input(s).parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Turns a scenario name into a safe file stem: ASCII letters, digits, `-`
/// and `_` are kept, everything else becomes `_`.
pub fn file_stem_for(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "scenario".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("5,000.00").unwrap(), dec!(5000.00));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_rejects_empty_input() {
        assert!(parse_decimal("").is_err());

        let err = parse_decimal("   ").unwrap_err();

        assert!(err.to_string().starts_with("invalid amount '   '"));
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        let err = parse_decimal("abc").unwrap_err();

        assert!(err.to_string().starts_with("invalid amount 'abc'"));
    }

    #[test]
    fn file_stem_replaces_unsafe_characters() {
        assert_eq!(file_stem_for("Scenario 1"), "Scenario_1");
        assert_eq!(file_stem_for("Família/Médico"), "Fam_lia_M_dico");
        assert_eq!(file_stem_for("  "), "scenario");
    }
}
