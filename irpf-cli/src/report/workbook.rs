use std::fs;
use std::path::{Path, PathBuf};

use irpf_core::ScenarioComparison;
use tracing::{debug, info};

use super::{ReportError, ReportRenderer};
use crate::utils::file_stem_for;

const SUMMARY_SHEET: &str = "summary.csv";

/// Exports a workbook as a directory of CSV sheets: `summary.csv` plus one
/// sheet per scenario, named `NN-<scenario>.csv` in scenario order.
///
/// Amounts are written exactly as calculated, without rounding. Sheets left
/// by an earlier export into the same directory are removed first; other
/// files are left alone.
pub struct WorkbookExporter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl WorkbookExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Sheets written by the last call to `render`, summary first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Removes `summary.csv` and every `NN-*.csv` sheet already in the directory.
    fn clear_previous_sheets(&self) -> Result<(), ReportError> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_sheet = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_sheet_name);
            if is_sheet && path.is_file() {
                debug!(path = %path.display(), "removing stale sheet");
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn write_summary(
        &self,
        path: &Path,
        comparisons: &[ScenarioComparison],
    ) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["Scenario", "Monthly Tax", "Annual Tax", "Taxable Base"])?;
        for c in comparisons {
            writer.write_record([
                c.name.clone(),
                c.monthly_tax().normalize().to_string(),
                c.annual_tax().normalize().to_string(),
                c.taxable_base().normalize().to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_scenario(
        &self,
        path: &Path,
        comparison: &ScenarioComparison,
    ) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["Bracket", "Rate (%)", "Bracket Base", "Bracket Tax"])?;
        for b in &comparison.result.breakdown {
            writer.write_record([
                b.bracket.to_string(),
                b.bracket.rate_percent.normalize().to_string(),
                b.amount_taxed_in_bracket.normalize().to_string(),
                b.tax_owed_in_bracket.normalize().to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn is_sheet_name(name: &str) -> bool {
    if name == SUMMARY_SHEET {
        return true;
    }
    let Some(stem) = name.strip_suffix(".csv") else {
        return false;
    };
    let bytes = stem.as_bytes();
    bytes.len() > 3 && bytes[..2].iter().all(u8::is_ascii_digit) && bytes[2] == b'-'
}

impl ReportRenderer for WorkbookExporter {
    fn render(
        &mut self,
        comparisons: &[ScenarioComparison],
    ) -> Result<(), ReportError> {
        fs::create_dir_all(&self.dir)?;
        self.clear_previous_sheets()?;
        self.written.clear();

        let summary = self.dir.join(SUMMARY_SHEET);
        self.write_summary(&summary, comparisons)?;
        self.written.push(summary);

        for (idx, comparison) in comparisons.iter().enumerate() {
            let sheet = self
                .dir
                .join(format!("{:02}-{}.csv", idx + 1, file_stem_for(&comparison.name)));
            self.write_scenario(&sheet, comparison)?;
            self.written.push(sheet);
        }

        info!(dir = %self.dir.display(), sheets = self.written.len(), "workbook exported");
        Ok(())
    }
}
