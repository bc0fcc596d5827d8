use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal-rate bracket. `upper_bound` is `None` for the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate_percent: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate_percent: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate_percent,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_none()
    }
}

/// Renders the range as `"2500.01 - 3750"`, or `"6250.01 - inf"` for the top bracket.
impl fmt::Display for TaxBracket {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:.2} - ", self.lower_bound)?;
        match self.upper_bound {
            Some(upper) => write!(f, "{}", upper.normalize()),
            None => write!(f, "inf"),
        }
    }
}
