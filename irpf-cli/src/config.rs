//! TOML configuration for the simulator.
//!
//! ```toml
//! gross_monthly_income = "5000.00"
//! currency_symbol = "R$"
//! brackets_file = "brackets.csv"   # optional, relative to this file
//!
//! [[scenarios]]
//! name = "Baseline"
//! social_security = "500.00"
//! dependents = 0
//! ```
//!
//! Every scenario key except `name` defaults to zero. With no `[[scenarios]]`
//! table and no `scenarios_file`, a single starter scenario is used.

use std::path::{Path, PathBuf};

use irpf_core::{BracketTaxError, Scenario, ScenarioInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading or interpreting the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid scenario #{position}: {source}")]
    InvalidScenario {
        position: usize,
        #[source]
        source: BracketTaxError,
    },
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Gross income shared by every scenario.
    #[serde(default = "default_gross_monthly_income")]
    pub gross_monthly_income: Decimal,

    /// Prefix shown in report column headers.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Custom bracket schedule CSV; the built-in monthly schedule when absent.
    #[serde(default)]
    pub brackets_file: Option<PathBuf>,

    /// Scenario CSV used instead of the inline `[[scenarios]]` tables.
    #[serde(default)]
    pub scenarios_file: Option<PathBuf>,

    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
}

/// One `[[scenarios]]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub name: Option<String>,
    #[serde(default)]
    pub social_security: Decimal,
    #[serde(default)]
    pub dependents: Decimal,
    #[serde(default)]
    pub medical_expenses: Decimal,
    #[serde(default)]
    pub education_expenses: Decimal,
    #[serde(default)]
    pub alimony: Decimal,
}

fn default_gross_monthly_income() -> Decimal {
    Decimal::new(5000, 0)
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            gross_monthly_income: default_gross_monthly_income(),
            currency_symbol: default_currency_symbol(),
            brackets_file: None,
            scenarios_file: None,
            scenarios: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    /// Scenario used when nothing else is configured: 500.00 social security,
    /// no other deductions.
    pub fn starter() -> Self {
        Self {
            social_security: Decimal::new(500, 0),
            ..Self::default()
        }
    }

    fn to_scenario(
        &self,
        position: usize,
        gross_monthly_income: Decimal,
    ) -> Result<Scenario, ConfigError> {
        let invalid = |source| ConfigError::InvalidScenario { position, source };

        let input = ScenarioInput {
            gross_monthly_income,
            social_security_contribution: self.social_security,
            dependent_count: ScenarioInput::dependent_count_from_decimal(self.dependents)
                .map_err(invalid)?,
            medical_expenses: self.medical_expenses,
            education_expenses: self.education_expenses,
            alimony_paid: self.alimony,
        };
        input.validate().map_err(invalid)?;

        let name = self
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| Scenario::default_name(position));

        Ok(Scenario::new(name, input))
    }
}

impl SimulatorConfig {
    /// Reads a config file. Relative `brackets_file` and `scenarios_file`
    /// paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.brackets_file = config.brackets_file.map(|p| base.join(p));
            config.scenarios_file = config.scenarios_file.map(|p| base.join(p));
        }

        debug!(path = %path.display(), scenarios = config.scenarios.len(), "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Builds the inline scenarios against `gross_monthly_income`, or the
    /// starter scenario when none are configured.
    pub fn to_scenarios(
        &self,
        gross_monthly_income: Decimal,
    ) -> Result<Vec<Scenario>, ConfigError> {
        if self.scenarios.is_empty() {
            return Ok(vec![
                ScenarioConfig::starter().to_scenario(1, gross_monthly_income)?,
            ]);
        }

        self.scenarios
            .iter()
            .enumerate()
            .map(|(idx, scenario)| scenario.to_scenario(idx + 1, gross_monthly_income))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const FULL_TOML: &str = r#"
gross_monthly_income = "7500.00"
currency_symbol = "$"
brackets_file = "brackets.csv"

[[scenarios]]
name = "Baseline"
social_security = "750.00"

[[scenarios]]
social_security = 750
dependents = 2
medical_expenses = "120.50"
education_expenses = 300
alimony = "0"
"#;

    #[test]
    fn parses_full_config() {
        let config = SimulatorConfig::from_toml_str(FULL_TOML).expect("valid config");

        assert_eq!(config.gross_monthly_income, dec!(7500.00));
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.brackets_file, Some(PathBuf::from("brackets.csv")));
        assert_eq!(config.scenarios.len(), 2);
        assert_eq!(config.scenarios[1].medical_expenses, dec!(120.50));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = SimulatorConfig::from_toml_str("").expect("empty config is valid");

        assert_eq!(config, SimulatorConfig::default());
    }

    #[test]
    fn to_scenarios_names_and_income() {
        let config = SimulatorConfig::from_toml_str(FULL_TOML).unwrap();

        let scenarios = config.to_scenarios(config.gross_monthly_income).unwrap();

        assert_eq!(scenarios[0].name, "Baseline");
        assert_eq!(scenarios[1].name, "Scenario 2");
        assert_eq!(scenarios[1].input.dependent_count, 2);
        assert!(
            scenarios
                .iter()
                .all(|s| s.input.gross_monthly_income == dec!(7500.00))
        );
    }

    #[test]
    fn to_scenarios_falls_back_to_starter() {
        let scenarios = SimulatorConfig::default()
            .to_scenarios(dec!(5000.00))
            .unwrap();

        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "Scenario 1");
        assert_eq!(
            scenarios[0].input.social_security_contribution,
            dec!(500.00)
        );
    }

    #[test]
    fn negative_deduction_is_rejected() {
        let config = SimulatorConfig::from_toml_str(
            "[[scenarios]]\nname = \"Bad\"\nalimony = \"-10\"\n",
        )
        .unwrap();

        match config.to_scenarios(dec!(5000.00)).unwrap_err() {
            ConfigError::InvalidScenario { position, source } => {
                assert_eq!(position, 1);
                assert_eq!(
                    source,
                    BracketTaxError::InvalidInput {
                        field: "alimony_paid",
                        value: dec!(-10),
                    }
                );
            }
            other => panic!("expected InvalidScenario, got {:?}", other),
        }
    }

    #[test]
    fn fractional_dependents_are_rejected() {
        let config =
            SimulatorConfig::from_toml_str("[[scenarios]]\ndependents = 1.5\n").unwrap();

        assert!(matches!(
            config.to_scenarios(dec!(5000.00)),
            Err(ConfigError::InvalidScenario { position: 1, .. })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = SimulatorConfig::from_toml_str("salary = 5000\n");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = SimulatorConfig::load(Path::new("nowhere/irpf.toml")).unwrap_err();

        assert!(err.to_string().contains("nowhere/irpf.toml"));
    }
}
