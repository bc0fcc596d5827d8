use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::TaxBracket;

/// Tax attributed to a single bracket that the taxable base reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketResult {
    pub bracket: TaxBracket,

    /// Portion of the taxable base that falls inside this bracket.
    pub amount_taxed_in_bracket: Decimal,

    /// `amount_taxed_in_bracket * rate_percent / 100`, unrounded.
    pub tax_owed_in_bracket: Decimal,
}

/// Outcome of one bracket tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Gross income minus all deductions, floored at zero.
    pub taxable_base: Decimal,

    /// Sum of `tax_owed_in_bracket` over `breakdown`.
    pub total_tax: Decimal,

    /// Brackets actually reached, in ascending order.
    pub breakdown: Vec<BracketResult>,
}

impl ScenarioResult {
    pub fn zero() -> Self {
        Self {
            taxable_base: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            breakdown: Vec::new(),
        }
    }

    /// Sum of the amounts taxed across every reached bracket.
    pub fn total_amount_taxed(&self) -> Decimal {
        self.breakdown
            .iter()
            .map(|b| b.amount_taxed_in_bracket)
            .sum()
    }

    /// Tax divided by taxable base, as a percentage. Zero when the base is zero.
    pub fn effective_rate_percent(&self) -> Decimal {
        if self.taxable_base.is_zero() {
            Decimal::ZERO
        } else {
            self.total_tax / self.taxable_base * Decimal::ONE_HUNDRED
        }
    }
}
