//! Side-by-side comparison of several scenarios.
//!
//! Each scenario is calculated independently; results come back in the same
//! order and under the same names as the input scenarios.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{BracketTaxCalculator, BracketTaxError, ScenarioInput, ScenarioResult};

/// Months per year used to annualize monthly tax.
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// A named set of inputs to compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub input: ScenarioInput,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        input: ScenarioInput,
    ) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }

    /// Default label for the scenario at a 1-based position.
    pub fn default_name(position: usize) -> String {
        format!("Scenario {position}")
    }

    /// Overwrites the gross income of every scenario with `gross_monthly_income`.
    pub fn with_shared_income(
        scenarios: Vec<Scenario>,
        gross_monthly_income: Decimal,
    ) -> Vec<Scenario> {
        scenarios
            .into_iter()
            .map(|mut scenario| {
                scenario.input.gross_monthly_income = gross_monthly_income;
                scenario
            })
            .collect()
    }
}

/// One scenario together with its calculated result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub name: String,
    pub input: ScenarioInput,
    pub result: ScenarioResult,
    pub annual_tax: Decimal,
}

impl ScenarioComparison {
    pub fn monthly_tax(&self) -> Decimal {
        self.result.total_tax
    }

    /// Monthly tax over twelve months.
    pub fn annual_tax(&self) -> Decimal {
        self.annual_tax
    }

    pub fn taxable_base(&self) -> Decimal {
        self.result.taxable_base
    }
}

/// Runs the calculator once per scenario.
///
/// # Errors
///
/// Stops at the first scenario whose calculation fails.
pub fn compare_scenarios(
    calculator: &BracketTaxCalculator<'_>,
    scenarios: &[Scenario],
) -> Result<Vec<ScenarioComparison>, BracketTaxError> {
    let comparisons = scenarios
        .iter()
        .map(|scenario| {
            let result = calculator.calculate(&scenario.input)?;
            let annual_tax = result
                .total_tax
                .checked_mul(MONTHS_PER_YEAR)
                .ok_or(BracketTaxError::Overflow("annual tax"))?;
            Ok(ScenarioComparison {
                name: scenario.name.clone(),
                input: scenario.input.clone(),
                result,
                annual_tax,
            })
        })
        .collect::<Result<Vec<_>, BracketTaxError>>()?;

    info!(scenarios = comparisons.len(), "scenarios compared");
    Ok(comparisons)
}
