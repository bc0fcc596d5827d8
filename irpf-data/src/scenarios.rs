//! CSV loader for scenario input data.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header names
//! are case-sensitive and must match exactly.
//!
//! | Column                 | Required | Type    | Notes                                          |
//! |------------------------|----------|---------|------------------------------------------------|
//! | `name`                 | no       | string  | Defaults to `Scenario N` (1-based row number)   |
//! | `gross_monthly_income` | no       | decimal | Falls back to the shared income when empty      |
//! | `social_security`      | no       | decimal | Empty means `0`                                 |
//! | `dependents`           | no       | integer | Whole, non-negative; empty means `0`            |
//! | `medical_expenses`     | no       | decimal | Empty means `0`                                 |
//! | `education_expenses`   | no       | decimal | Empty means `0`                                 |
//! | `alimony`              | no       | decimal | Empty means `0`                                 |
//!
//! ### Example
//!
//! ```csv
//! name,gross_monthly_income,social_security,dependents,medical_expenses
//! Baseline,5000.00,500.00,0,
//! Family,5000.00,500.00,2,350.00
//! ```
use std::path::{Path, PathBuf};

use irpf_core::{BracketTaxError, Scenario, ScenarioInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: Option<String>,
    gross_monthly_income: Option<Decimal>,
    social_security: Option<Decimal>,
    dependents: Option<Decimal>,
    medical_expenses: Option<Decimal>,
    education_expenses: Option<Decimal>,
    alimony: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading scenarios from CSV.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioCsvError {
    /// The underlying CSV deserialisation failed (bad structure, type
    /// mismatch, wrong column count, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row left `gross_monthly_income` empty and no shared income was given.
    #[error("no gross monthly income on row {row} and no shared income was given")]
    MissingIncome { row: usize },

    /// A row carried a negative amount or a fractional/negative dependent count.
    #[error("invalid scenario on row {row}: {source}")]
    InvalidInput {
        row: usize,
        #[source]
        source: BracketTaxError,
    },

    /// The file could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Convert a single CSV row into a validated Scenario.
///
/// row_number is 1-based (for error messages and default names).
fn convert_row(
    row: CsvRow,
    row_number: usize,
    shared_income: Option<Decimal>,
) -> Result<Scenario, ScenarioCsvError> {
    let invalid = |source| ScenarioCsvError::InvalidInput {
        row: row_number,
        source,
    };

    let gross_monthly_income = row
        .gross_monthly_income
        .or(shared_income)
        .ok_or(ScenarioCsvError::MissingIncome { row: row_number })?;

    let dependent_count = ScenarioInput::dependent_count_from_decimal(
        row.dependents.unwrap_or(Decimal::ZERO),
    )
    .map_err(invalid)?;

    let input = ScenarioInput {
        gross_monthly_income,
        social_security_contribution: row.social_security.unwrap_or(Decimal::ZERO),
        dependent_count,
        medical_expenses: row.medical_expenses.unwrap_or(Decimal::ZERO),
        education_expenses: row.education_expenses.unwrap_or(Decimal::ZERO),
        alimony_paid: row.alimony.unwrap_or(Decimal::ZERO),
    };
    input.validate().map_err(invalid)?;

    let name = row
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| Scenario::default_name(row_number));

    debug!(row = row_number, %name, "scenario row parsed");
    Ok(Scenario::new(name, input))
}

/// Parse CSV text and return the scenarios in file order.
///
/// `shared_income` fills in rows whose `gross_monthly_income` cell is empty.
///
/// # Errors
///
/// * [ScenarioCsvError::Parse] – if the CSV is structurally invalid or a
///   field cannot be deserialised.
/// * [ScenarioCsvError::MissingIncome] – if a row has no income and no
///   shared income was given.
/// * [ScenarioCsvError::InvalidInput] – if a row fails validation.
pub fn load_from_str(
    input: &str,
    shared_income: Option<Decimal>,
) -> Result<Vec<Scenario>, ScenarioCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number, shared_income)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
///
/// # Errors
///
/// Returns [ScenarioCsvError::Io] when the file cannot be read, or any
/// error of [load_from_str] when the contents are invalid.
pub fn load_from_file(
    path: &Path,
    shared_income: Option<Decimal>,
) -> Result<Vec<Scenario>, ScenarioCsvError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScenarioCsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let scenarios = load_from_str(&contents, shared_income)?;

    info!(path = %path.display(), count = scenarios.len(), "loaded scenarios");
    Ok(scenarios)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
