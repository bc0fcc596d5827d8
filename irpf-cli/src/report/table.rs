use std::io::Write;

use irpf_core::ScenarioComparison;
use irpf_core::calculations::common::{format_currency, round_half_up};

use super::{ReportError, ReportRenderer, money_header};

/// Plain-text comparison table followed by a bracket detail table per scenario.
pub struct SummaryTable<W: Write> {
    out: W,
    currency: String,
}

impl<W: Write> SummaryTable<W> {
    pub fn new(
        out: W,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            out,
            currency: currency.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_summary(
        &mut self,
        comparisons: &[ScenarioComparison],
    ) -> Result<(), ReportError> {
        let headers = vec![
            "Scenario".to_string(),
            money_header("Monthly Tax", &self.currency),
            money_header("Annual Tax", &self.currency),
            money_header("Taxable Base", &self.currency),
        ];
        let rows: Vec<Vec<String>> = comparisons
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    format_currency(c.monthly_tax()),
                    format_currency(c.annual_tax()),
                    format_currency(c.taxable_base()),
                ]
            })
            .collect();

        writeln!(self.out, "Scenario Comparison")?;
        write_table(&mut self.out, &headers, &rows)
    }

    fn write_breakdown(
        &mut self,
        comparison: &ScenarioComparison,
    ) -> Result<(), ReportError> {
        writeln!(self.out)?;
        writeln!(self.out, "{} - Tax by Bracket", comparison.name)?;

        if comparison.result.breakdown.is_empty() {
            writeln!(self.out, "(no taxable base)")?;
            return Ok(());
        }

        let headers = vec![
            "Bracket".to_string(),
            "Rate (%)".to_string(),
            money_header("Bracket Base", &self.currency),
            money_header("Bracket Tax", &self.currency),
        ];
        let rows: Vec<Vec<String>> = comparison
            .result
            .breakdown
            .iter()
            .map(|b| {
                vec![
                    b.bracket.to_string(),
                    b.bracket.rate_percent.normalize().to_string(),
                    format_currency(b.amount_taxed_in_bracket),
                    format_currency(b.tax_owed_in_bracket),
                ]
            })
            .collect();

        write_table(&mut self.out, &headers, &rows)?;
        writeln!(
            self.out,
            "Effective rate: {}%",
            round_half_up(comparison.result.effective_rate_percent())
        )?;
        Ok(())
    }
}

impl<W: Write> ReportRenderer for SummaryTable<W> {
    fn render(
        &mut self,
        comparisons: &[ScenarioComparison],
    ) -> Result<(), ReportError> {
        self.write_summary(comparisons)?;
        for comparison in comparisons {
            self.write_breakdown(comparison)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Writes an aligned table: first column left-aligned, the rest right-aligned.
fn write_table<W: Write>(
    out: &mut W,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<(), ReportError> {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, (cell, width))| {
                if col == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    writeln!(out, "{}", format_row(headers))?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in rows {
        writeln!(out, "{}", format_row(row.as_slice()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use irpf_core::calculations::{BracketTaxCalculator, monthly_schedule};
    use irpf_core::{Scenario, ScenarioInput, compare_scenarios};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn render(scenarios: &[Scenario]) -> String {
        let schedule = monthly_schedule();
        let calculator = BracketTaxCalculator::new(&schedule);
        let comparisons = compare_scenarios(&calculator, scenarios).unwrap();

        let mut table = SummaryTable::new(Vec::new(), "R$");
        table.render(&comparisons).unwrap();
        String::from_utf8(table.into_inner()).unwrap()
    }

    #[test]
    fn summary_lists_each_scenario_with_rounded_amounts() {
        let mut input = ScenarioInput::new(dec!(5000.00));
        input.social_security_contribution = dec!(500.00);

        let output = render(&[Scenario::new("Baseline", input)]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Scenario Comparison");
        assert_eq!(
            lines[1],
            "Scenario | Monthly Tax (R$) | Annual Tax (R$) | Taxable Base (R$)"
        );
        assert_eq!(
            lines[3],
            "Baseline |           206.25 |        2,474.97 |          4,500.00"
        );
    }

    #[test]
    fn breakdown_lists_reached_brackets() {
        let output = render(&[Scenario::new("Top", ScenarioInput::new(dec!(5000.00)))]);

        assert!(output.contains("Top - Tax by Bracket"));
        assert!(output.contains("0.00 - 2500"));
        assert!(output.contains("2500.01 - 3750"));
        assert!(output.contains("3750.01 - 5000"));
        assert!(!output.contains("5000.01 - 6250"));
        assert!(output.contains("187.50"));
    }

    #[test]
    fn zero_base_is_reported_without_table() {
        let output = render(&[Scenario::new("Nothing", ScenarioInput::new(dec!(0)))]);

        assert!(output.contains("Nothing - Tax by Bracket\n(no taxable base)"));
    }
}
