use std::io::Read;
use std::path::Path;

use irpf_core::calculations::validate_schedule;
use irpf_core::{BracketTaxError, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading a bracket schedule.
#[derive(Debug, Error)]
pub enum BracketScheduleError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Cannot open '{path}': {message}")]
    Io { path: String, message: String },

    #[error(transparent)]
    Schedule(#[from] BracketTaxError),
}

impl From<csv::Error> for BracketScheduleError {
    fn from(err: csv::Error) -> Self {
        BracketScheduleError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket schedule CSV file.
///
/// - `lower_bound`: The lowest base taxed in this bracket
/// - `upper_bound`: The highest base taxed in this bracket (empty or `inf` for unlimited)
/// - `rate_percent`: The marginal rate as a percentage (e.g., 7.5 for 7.5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_bound")]
    pub upper_bound: Option<Decimal>,
    pub rate_percent: Decimal,
}

fn deserialize_optional_bound<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("infinity") => Ok(None),
        Some(s) => s
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Loader for bracket schedules from CSV files.
///
/// Records are kept in file order; the schedule must already be sorted
/// ascending by `lower_bound`.
pub struct BracketScheduleLoader;

impl BracketScheduleLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketScheduleError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Convert parsed records into a validated schedule.
    pub fn into_schedule(
        records: &[BracketRecord]
    ) -> Result<Vec<TaxBracket>, BracketScheduleError> {
        let schedule: Vec<TaxBracket> = records
            .iter()
            .map(|r| TaxBracket::new(r.lower_bound, r.upper_bound, r.rate_percent))
            .collect();

        validate_schedule(&schedule)?;
        Ok(schedule)
    }

    /// Read, parse and validate a schedule file.
    pub fn load_from_file(path: &Path) -> Result<Vec<TaxBracket>, BracketScheduleError> {
        let file = std::fs::File::open(path).map_err(|e| BracketScheduleError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let records = Self::parse(file)?;
        let schedule = Self::into_schedule(&records)?;

        info!(path = %path.display(), brackets = schedule.len(), "loaded bracket schedule");
        Ok(schedule)
    }
}
