//! Resolves configuration and command-line overrides into a schedule and a
//! list of scenarios, then runs the comparison.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use irpf_core::calculations::{BracketTaxCalculator, monthly_schedule};
use irpf_core::{Scenario, ScenarioComparison, TaxBracket, compare_scenarios};
use irpf_data::{BracketScheduleLoader, scenarios};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::SimulatorConfig;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub salary: Option<Decimal>,
    pub scenarios_file: Option<PathBuf>,
    pub brackets_file: Option<PathBuf>,
}

/// Loads the custom schedule when one is configured, else the built-in one.
pub fn load_schedule(
    config: &SimulatorConfig,
    overrides: &Overrides,
) -> Result<Vec<TaxBracket>> {
    match overrides
        .brackets_file
        .as_ref()
        .or(config.brackets_file.as_ref())
    {
        Some(path) => BracketScheduleLoader::load_from_file(path)
            .with_context(|| format!("Failed to load bracket schedule: {}", path.display())),
        None => {
            debug!("using built-in monthly schedule");
            Ok(monthly_schedule())
        }
    }
}

/// Builds the scenarios to compare.
///
/// A `--salary` override replaces the gross income of every scenario,
/// including rows of a scenario CSV that carry their own income.
pub fn resolve_scenarios(
    config: &SimulatorConfig,
    overrides: &Overrides,
) -> Result<Vec<Scenario>> {
    let income = overrides.salary.unwrap_or(config.gross_monthly_income);

    let loaded = match overrides
        .scenarios_file
        .as_ref()
        .or(config.scenarios_file.as_ref())
    {
        Some(path) => scenarios::load_from_file(path, Some(income))
            .with_context(|| format!("Failed to load scenarios: {}", path.display()))?,
        None => config
            .to_scenarios(income)
            .context("Failed to build scenarios from config")?,
    };

    if loaded.is_empty() {
        bail!("no scenarios to compare");
    }

    Ok(match overrides.salary {
        Some(salary) => Scenario::with_shared_income(loaded, salary),
        None => loaded,
    })
}

/// Resolves inputs and compares every scenario.
pub fn run(
    config: &SimulatorConfig,
    overrides: &Overrides,
) -> Result<Vec<ScenarioComparison>> {
    let schedule = load_schedule(config, overrides)?;
    let calculator = BracketTaxCalculator::try_new(&schedule).context("Invalid bracket schedule")?;
    let scenarios = resolve_scenarios(config, overrides)?;

    info!(
        scenarios = scenarios.len(),
        brackets = schedule.len(),
        "comparing scenarios"
    );

    compare_scenarios(&calculator, &scenarios).context("Failed to calculate scenarios")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_runs_starter_scenario() {
        let comparisons = run(&SimulatorConfig::default(), &Overrides::default()).unwrap();

        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].taxable_base(), dec!(4500.00));
        assert_eq!(comparisons[0].monthly_tax(), dec!(206.24775));
    }

    #[test]
    fn salary_override_replaces_config_income() {
        let overrides = Overrides {
            salary: Some(dec!(2000.00)),
            ..Overrides::default()
        };

        let comparisons = run(&SimulatorConfig::default(), &overrides).unwrap();

        assert_eq!(comparisons[0].taxable_base(), dec!(1500.00));
        assert_eq!(comparisons[0].monthly_tax(), dec!(0));
    }

    #[test]
    fn negative_salary_is_rejected() {
        let overrides = Overrides {
            salary: Some(dec!(-1.00)),
            ..Overrides::default()
        };

        assert!(run(&SimulatorConfig::default(), &overrides).is_err());
    }

    #[test]
    fn largest_salary_reports_overflow() {
        let overrides = Overrides {
            salary: Some(Decimal::MAX),
            ..Overrides::default()
        };

        let err = run(&SimulatorConfig::default(), &overrides).unwrap_err();

        assert_eq!(
            err.downcast_ref::<irpf_core::BracketTaxError>(),
            Some(&irpf_core::BracketTaxError::Overflow("annual tax"))
        );
    }

    #[test]
    fn missing_brackets_file_is_an_error() {
        let overrides = Overrides {
            brackets_file: Some(PathBuf::from("missing/brackets.csv")),
            ..Overrides::default()
        };

        let err = load_schedule(&SimulatorConfig::default(), &overrides).unwrap_err();

        assert!(err.to_string().contains("missing/brackets.csv"));
    }
}
