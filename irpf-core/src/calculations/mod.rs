//! Progressive bracket tax calculations.
//!
//! This module provides the bracket tax calculator, the built-in monthly
//! schedule and the shared rounding helpers used when results are presented.

pub mod bracket_tax;
pub mod common;
pub mod schedule;

pub use bracket_tax::{BracketTaxCalculator, BracketTaxError, DEPENDENT_DEDUCTION, compute};
pub use schedule::{monthly_schedule, validate_schedule};
