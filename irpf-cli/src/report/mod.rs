//! Presentation adapters for scenario comparisons.
//!
//! Every adapter implements [`ReportRenderer`] and only consumes
//! [`ScenarioComparison`] values; none of them touch the calculator.

mod chart;
mod table;
mod workbook;

use irpf_core::ScenarioComparison;
use thiserror::Error;

pub use chart::BarChart;
pub use table::SummaryTable;
pub use workbook::WorkbookExporter;

/// Errors raised while rendering or exporting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Something that can present a set of scenario comparisons.
pub trait ReportRenderer {
    fn render(
        &mut self,
        comparisons: &[ScenarioComparison],
    ) -> Result<(), ReportError>;
}

/// Column header with the currency symbol appended, e.g. `Monthly Tax (R$)`.
fn money_header(
    title: &str,
    currency: &str,
) -> String {
    if currency.is_empty() {
        title.to_string()
    } else {
        format!("{title} ({currency})")
    }
}
