//! The built-in monthly bracket schedule and validation for custom schedules.
//!
//! | Lower   | Upper | Rate  |
//! |---------|-------|-------|
//! | 0       | 2500  | 0%    |
//! | 2500.01 | 3750  | 7.5%  |
//! | 3750.01 | 5000  | 15%   |
//! | 5000.01 | 6250  | 22.5% |
//! | 6250.01 | inf   | 27.5% |
//!
//! Each lower bound sits one cent above the previous upper bound. A taxable
//! base that lands in that one-cent gap is not taxed by either bracket; the
//! table is reproduced as published, gaps included.

use rust_decimal::Decimal;
use tracing::debug;

use crate::TaxBracket;
use crate::calculations::BracketTaxError;

/// Largest gap allowed between one bracket's upper bound and the next lower bound.
const MAX_BOUNDARY_GAP: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns the fixed five-bracket monthly schedule in ascending order.
pub fn monthly_schedule() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(Decimal::ZERO, Some(Decimal::new(2500, 0)), Decimal::ZERO),
        TaxBracket::new(
            Decimal::new(250001, 2),
            Some(Decimal::new(3750, 0)),
            Decimal::new(75, 1),
        ),
        TaxBracket::new(
            Decimal::new(375001, 2),
            Some(Decimal::new(5000, 0)),
            Decimal::new(15, 0),
        ),
        TaxBracket::new(
            Decimal::new(500001, 2),
            Some(Decimal::new(6250, 0)),
            Decimal::new(225, 1),
        ),
        TaxBracket::new(Decimal::new(625001, 2), None, Decimal::new(275, 1)),
    ]
}

/// Checks that a schedule is usable by the calculator.
///
/// A valid schedule starts at zero, is sorted ascending, has no overlaps, has
/// gaps of at most one cent between brackets, has only its last bracket
/// unbounded, and uses rates between 0% and 100%.
///
/// # Errors
///
/// Returns [`BracketTaxError::NoTaxBrackets`] for an empty schedule, or
/// [`BracketTaxError::InvalidSchedule`] describing the first problem found.
pub fn validate_schedule(brackets: &[TaxBracket]) -> Result<(), BracketTaxError> {
    let Some(first) = brackets.first() else {
        return Err(BracketTaxError::NoTaxBrackets);
    };

    if !first.lower_bound.is_zero() {
        return Err(BracketTaxError::InvalidSchedule(format!(
            "first bracket must start at 0, found {}",
            first.lower_bound
        )));
    }

    for (idx, bracket) in brackets.iter().enumerate() {
        let position = idx + 1;

        if bracket.rate_percent < Decimal::ZERO || bracket.rate_percent > Decimal::ONE_HUNDRED {
            return Err(BracketTaxError::InvalidSchedule(format!(
                "bracket {position} has rate {}% outside 0-100%",
                bracket.rate_percent
            )));
        }

        match (bracket.upper_bound, idx + 1 == brackets.len()) {
            (None, false) => {
                return Err(BracketTaxError::InvalidSchedule(format!(
                    "bracket {position} is unbounded but is not the last bracket"
                )));
            }
            (Some(_), true) => {
                return Err(BracketTaxError::InvalidSchedule(format!(
                    "last bracket {position} must be unbounded"
                )));
            }
            (Some(upper), false) if upper <= bracket.lower_bound => {
                return Err(BracketTaxError::InvalidSchedule(format!(
                    "bracket {position} upper bound {upper} is not above lower bound {}",
                    bracket.lower_bound
                )));
            }
            _ => {}
        }

        if let Some(previous) = idx.checked_sub(1).map(|p| &brackets[p]) {
            // Every non-last bracket is bounded once the checks above pass.
            let previous_upper = previous.upper_bound.unwrap_or(Decimal::MAX);
            let gap = bracket
                .lower_bound
                .checked_sub(previous_upper)
                // Only a lower bound far below the previous bracket underflows.
                .unwrap_or(Decimal::MIN);

            if gap < Decimal::ZERO {
                return Err(BracketTaxError::InvalidSchedule(format!(
                    "bracket {position} overlaps the previous bracket"
                )));
            }
            if gap > MAX_BOUNDARY_GAP {
                return Err(BracketTaxError::InvalidSchedule(format!(
                    "gap of {gap} between bracket {idx} and bracket {position}"
                )));
            }
        }
    }

    debug!(brackets = brackets.len(), "bracket schedule validated");
    Ok(())
}
