use std::io::Write;

use irpf_core::ScenarioComparison;
use irpf_core::calculations::common::format_currency;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::{ReportError, ReportRenderer};

const BAR: char = '█';

/// Horizontal text bar charts: monthly tax per scenario, then tax per bracket
/// for every scenario.
pub struct BarChart<W: Write> {
    out: W,
    width: usize,
    currency: String,
}

impl<W: Write> BarChart<W> {
    /// `width` is the length in characters of the longest bar.
    pub fn new(
        out: W,
        width: usize,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            out,
            width,
            currency: currency.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_chart(
        &mut self,
        title: &str,
        bars: &[(String, Decimal)],
    ) -> Result<(), ReportError> {
        writeln!(self.out)?;
        writeln!(self.out, "{title}")?;

        let peak = bars
            .iter()
            .map(|(_, value)| *value)
            .max()
            .unwrap_or(Decimal::ZERO);
        let label_width = bars
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        for (label, value) in bars {
            let length = bar_length(*value, peak, self.width);
            let bar: String = std::iter::repeat_n(BAR, length).collect();
            let gap = if length == 0 { "" } else { " " };
            writeln!(
                self.out,
                "{label:<label_width$} | {bar}{gap}{} {}",
                self.currency,
                format_currency(*value)
            )?;
        }
        Ok(())
    }
}

/// Scales `value` against `peak` onto `0..=width` characters.
fn bar_length(
    value: Decimal,
    peak: Decimal,
    width: usize,
) -> usize {
    if peak <= Decimal::ZERO || value <= Decimal::ZERO {
        return 0;
    }
    (value / peak * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
}

impl<W: Write> ReportRenderer for BarChart<W> {
    fn render(
        &mut self,
        comparisons: &[ScenarioComparison],
    ) -> Result<(), ReportError> {
        let monthly: Vec<(String, Decimal)> = comparisons
            .iter()
            .map(|c| (c.name.clone(), c.monthly_tax()))
            .collect();
        self.write_chart("Monthly Tax by Scenario", &monthly)?;

        for comparison in comparisons {
            let per_bracket: Vec<(String, Decimal)> = comparison
                .result
                .breakdown
                .iter()
                .map(|b| (b.bracket.to_string(), b.tax_owed_in_bracket))
                .collect();
            self.write_chart(
                &format!("{} - Tax by Bracket", comparison.name),
                &per_bracket,
            )?;
        }

        self.out.flush()?;
        Ok(())
    }
}
