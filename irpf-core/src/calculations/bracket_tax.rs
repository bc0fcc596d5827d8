//! Progressive bracket tax calculation.
//!
//! The calculation runs in three steps:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Dependent deduction (dependents × 220.00) |
//! | 2    | Taxable base (gross − social security − dependents − medical − education − alimony, minimum 0) |
//! | 3    | Marginal tax for every bracket whose lower bound the base exceeds |
//!
//! Amounts are exact decimals. Nothing is rounded here; see
//! [`round_half_up`](crate::calculations::common::round_half_up) for presentation.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use irpf_core::calculations::{BracketTaxCalculator, monthly_schedule};
//! use irpf_core::ScenarioInput;
//!
//! let schedule = monthly_schedule();
//! let calculator = BracketTaxCalculator::new(&schedule);
//!
//! let mut input = ScenarioInput::new(dec!(5000.00));
//! input.social_security_contribution = dec!(500.00);
//!
//! let result = calculator.calculate(&input).unwrap();
//!
//! assert_eq!(result.taxable_base, dec!(4500.00));
//! assert_eq!(result.breakdown.len(), 3);
//! // 1249.99 × 7.5% + 749.99 × 15%
//! assert_eq!(result.total_tax, dec!(206.24775));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, trace};

use crate::calculations::common::max;
use crate::calculations::schedule::{monthly_schedule, validate_schedule};
use crate::{BracketResult, ScenarioInput, ScenarioResult, TaxBracket};

/// Deduction granted per dependent.
pub const DEPENDENT_DEDUCTION: Decimal = Decimal::from_parts(220, 0, 0, false, 0);

/// Errors that can occur during bracket tax calculations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BracketTaxError {
    /// An input value was negative or not a whole dependent count.
    #[error("invalid input: {field} cannot be {value}")]
    InvalidInput { field: &'static str, value: Decimal },

    /// No tax brackets were provided for the calculation.
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    /// A custom bracket schedule failed validation.
    #[error("invalid bracket schedule: {0}")]
    InvalidSchedule(String),

    /// A result does not fit in a `Decimal`.
    #[error("arithmetic overflow while calculating {0}")]
    Overflow(&'static str),
}

/// Computes the tax for one scenario against the built-in monthly schedule.
///
/// # Errors
///
/// Returns [`BracketTaxError::InvalidInput`] if any monetary argument is negative.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let result = irpf_core::compute(
///     dec!(5000.00),
///     Decimal::ZERO,
///     0,
///     Decimal::ZERO,
///     Decimal::ZERO,
///     Decimal::ZERO,
/// )
/// .unwrap();
///
/// assert_eq!(result.total_tax, dec!(281.24775));
/// ```
pub fn compute(
    gross_monthly_income: Decimal,
    social_security_contribution: Decimal,
    dependent_count: u32,
    medical_expenses: Decimal,
    education_expenses: Decimal,
    alimony_paid: Decimal,
) -> Result<ScenarioResult, BracketTaxError> {
    let input = ScenarioInput {
        gross_monthly_income,
        social_security_contribution,
        dependent_count,
        medical_expenses,
        education_expenses,
        alimony_paid,
    };

    let schedule = monthly_schedule();
    BracketTaxCalculator::new(&schedule).calculate(&input)
}

/// Calculator for progressive bracket tax.
///
/// Holds a borrowed bracket schedule sorted by `lower_bound` ascending, whose
/// last bracket is unbounded.
#[derive(Debug, Clone)]
pub struct BracketTaxCalculator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BracketTaxCalculator<'a> {
    /// Creates a calculator over the given brackets without checking them.
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Creates a calculator after validating the schedule.
    ///
    /// # Errors
    ///
    /// Returns the error produced by [`validate_schedule`].
    pub fn try_new(brackets: &'a [TaxBracket]) -> Result<Self, BracketTaxError> {
        validate_schedule(brackets)?;
        Ok(Self::new(brackets))
    }

    pub fn brackets(&self) -> &'a [TaxBracket] {
        self.brackets
    }

    /// Calculates the taxable base, per-bracket breakdown and total tax.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTaxError`] if:
    /// - No tax brackets were provided
    /// - Any monetary input is negative
    pub fn calculate(
        &self,
        input: &ScenarioInput,
    ) -> Result<ScenarioResult, BracketTaxError> {
        if self.brackets.is_empty() {
            return Err(BracketTaxError::NoTaxBrackets);
        }
        input.validate()?;

        let dependent_deduction = self.dependent_deduction(input.dependent_count);
        let taxable_base = self.taxable_base(input, dependent_deduction);
        let breakdown = self.breakdown(taxable_base)?;
        let total_tax = breakdown
            .iter()
            .try_fold(Decimal::ZERO, |acc, b| acc.checked_add(b.tax_owed_in_bracket))
            .ok_or(BracketTaxError::Overflow("total tax"))?;

        debug!(
            %taxable_base,
            %total_tax,
            brackets_reached = breakdown.len(),
            "bracket tax calculated"
        );

        Ok(ScenarioResult {
            taxable_base,
            total_tax,
            breakdown,
        })
    }

    /// Calculates the deduction for dependents.
    fn dependent_deduction(
        &self,
        dependent_count: u32,
    ) -> Decimal {
        Decimal::from(dependent_count) * DEPENDENT_DEDUCTION
    }

    /// Calculates the taxable base, clamped at zero.
    ///
    /// Deductions whose sum does not fit in a `Decimal` exceed any income, so
    /// the base is zero.
    fn taxable_base(
        &self,
        input: &ScenarioInput,
        dependent_deduction: Decimal,
    ) -> Decimal {
        let deductions = [
            input.social_security_contribution,
            dependent_deduction,
            input.medical_expenses,
            input.education_expenses,
            input.alimony_paid,
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add);

        match deductions {
            Some(deductions) => max(input.gross_monthly_income - deductions, Decimal::ZERO),
            None => Decimal::ZERO,
        }
    }

    /// Calculates the tax for every bracket the base reaches.
    ///
    /// A bracket is reached only when the base is strictly above its lower bound.
    ///
    /// The rate is scaled to a fraction before multiplying, so the tax never
    /// exceeds the amount taxed.
    fn breakdown(
        &self,
        taxable_base: Decimal,
    ) -> Result<Vec<BracketResult>, BracketTaxError> {
        self.brackets
            .iter()
            .filter(|bracket| taxable_base > bracket.lower_bound)
            .map(|bracket| {
                let ceiling = bracket
                    .upper_bound
                    .map_or(taxable_base, |upper| taxable_base.min(upper));
                let amount_taxed_in_bracket = ceiling
                    .checked_sub(bracket.lower_bound)
                    .ok_or(BracketTaxError::Overflow("bracket amount"))?;
                let tax_owed_in_bracket = (bracket.rate_percent / Decimal::ONE_HUNDRED)
                    .checked_mul(amount_taxed_in_bracket)
                    .ok_or(BracketTaxError::Overflow("bracket tax"))?;

                trace!(
                    bracket = %bracket,
                    amount = %amount_taxed_in_bracket,
                    tax = %tax_owed_in_bracket,
                    "bracket reached"
                );

                Ok(BracketResult {
                    bracket: bracket.clone(),
                    amount_taxed_in_bracket,
                    tax_owed_in_bracket,
                })
            })
            .collect()
    }
}
