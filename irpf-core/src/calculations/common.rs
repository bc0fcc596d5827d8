//! Common utility functions for tax calculations.
//!
//! The calculator itself never rounds; these helpers exist for callers that
//! present or export amounts in whole cents.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(93.74925)), dec!(93.75));
/// assert_eq!(round_half_up(dec!(187.4985)), dec!(187.50));
/// assert_eq!(round_half_up(dec!(281.24775)), dec!(281.25));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-220.00), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(4280.00), dec!(0)), dec!(4280.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats an amount for display with two decimal places and comma thousands
/// separators, e.g. `12,345.68`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(187.4949));

        assert_eq!(result, dec!(187.49));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_bracket_tax_fractions() {
        assert_eq!(round_half_up(dec!(93.74925)), dec!(93.75));
        assert_eq!(round_half_up(dec!(1031.24725)), dec!(1031.25));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-123.455));

        assert_eq!(result, dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_zero() {
        let result = round_half_up(dec!(0.00));

        assert_eq!(result, dec!(0.00));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_clamps_negative_to_zero() {
        let result = max(dec!(-50.00), Decimal::ZERO);

        assert_eq!(result, Decimal::ZERO);
    }

    // =========================================================================
    // format_currency tests
    // =========================================================================

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_currency(dec!(5000)), "5,000.00");
    }

    #[test]
    fn format_currency_small_values() {
        assert_eq!(format_currency(dec!(0)), "0.00");
        assert_eq!(format_currency(dec!(93.74925)), "93.75");
        assert_eq!(format_currency(dec!(999.999)), "1,000.00");
    }

    #[test]
    fn format_currency_negative_values() {
        assert_eq!(format_currency(dec!(-2500.5)), "-2,500.50");
    }
}
