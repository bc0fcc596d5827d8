pub mod calculations;
pub mod models;
pub mod scenarios;

pub use calculations::{BracketTaxCalculator, BracketTaxError, compute};
pub use models::*;
pub use scenarios::{Scenario, ScenarioComparison, compare_scenarios};
