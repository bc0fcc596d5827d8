use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::calculations::BracketTaxError;

/// Income and deductions for a single scenario.
///
/// All monetary values are in local currency units per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub gross_monthly_income: Decimal,
    pub social_security_contribution: Decimal,
    pub dependent_count: u32,
    pub medical_expenses: Decimal,
    pub education_expenses: Decimal,
    pub alimony_paid: Decimal,
}

impl ScenarioInput {
    /// Creates an input with the given gross income and no deductions.
    pub fn new(gross_monthly_income: Decimal) -> Self {
        Self {
            gross_monthly_income,
            social_security_contribution: Decimal::ZERO,
            dependent_count: 0,
            medical_expenses: Decimal::ZERO,
            education_expenses: Decimal::ZERO,
            alimony_paid: Decimal::ZERO,
        }
    }

    /// Rejects any negative monetary field.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTaxError::InvalidInput`] naming the first negative field.
    pub fn validate(&self) -> Result<(), BracketTaxError> {
        let fields = [
            ("gross_monthly_income", self.gross_monthly_income),
            (
                "social_security_contribution",
                self.social_security_contribution,
            ),
            ("medical_expenses", self.medical_expenses),
            ("education_expenses", self.education_expenses),
            ("alimony_paid", self.alimony_paid),
        ];

        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(BracketTaxError::InvalidInput { field, value });
            }
        }

        Ok(())
    }

    /// Converts a dependent count read as a decimal (from CSV or config text)
    /// into a whole, non-negative count.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTaxError::InvalidInput`] for negative, fractional or
    /// out-of-range values.
    pub fn dependent_count_from_decimal(value: Decimal) -> Result<u32, BracketTaxError> {
        let invalid = BracketTaxError::InvalidInput {
            field: "dependent_count",
            value,
        };

        if value < Decimal::ZERO || !value.fract().is_zero() {
            return Err(invalid);
        }

        value.to_u32().ok_or(invalid)
    }
}
