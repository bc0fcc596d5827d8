//! End-to-end tests: config fixture on disk, custom bracket schedule,
//! comparison, and every report adapter.

use std::fs;
use std::path::{Path, PathBuf};

use irpf_cli::app::{self, Overrides};
use irpf_cli::config::SimulatorConfig;
use irpf_cli::report::{BarChart, ReportRenderer, SummaryTable, WorkbookExporter};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture_config() -> SimulatorConfig {
    SimulatorConfig::load(&fixture_path("irpf.toml")).expect("fixture config should load")
}

#[test]
fn test_fixture_config_resolves_relative_brackets_file() {
    let config = load_fixture_config();

    assert_eq!(
        config.brackets_file,
        Some(fixture_path("flat_brackets.csv"))
    );
}

#[test]
fn test_fixture_config_uses_custom_schedule() {
    let config = load_fixture_config();

    let comparisons = app::run(&config, &Overrides::default()).expect("run should succeed");

    let names: Vec<&str> = comparisons.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Baseline", "Two dependents", "Scenario 3"]);

    // 6000 - 600 = 5400; (5400 - 1000) * 10%
    assert_eq!(comparisons[0].taxable_base(), dec!(5400.00));
    assert_eq!(comparisons[0].monthly_tax(), dec!(440.00));
    assert_eq!(comparisons[0].annual_tax(), dec!(5280.00));

    // 6000 - 600 - 440 - 150 = 4810
    assert_eq!(comparisons[1].taxable_base(), dec!(4810.00));
    assert_eq!(comparisons[1].monthly_tax(), dec!(381.00));

    // 6000 - 600 - 400 - 1000 = 4000
    assert_eq!(comparisons[2].monthly_tax(), dec!(300.00));
}

#[test]
fn test_cli_brackets_override_restores_built_in_table() {
    let config = load_fixture_config();
    let overrides = Overrides {
        brackets_file: Some(
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("irpf-data")
                .join("test-data")
                .join("monthly_brackets.csv"),
        ),
        ..Overrides::default()
    };

    let comparisons = app::run(&config, &overrides).expect("run should succeed");

    // 5400: 93.74925 + 187.4985 + (5400 - 5000.01) * 22.5%
    assert_eq!(comparisons[0].monthly_tax(), dec!(371.2455));
}

#[test]
fn test_scenario_csv_override_with_salary() {
    let config = load_fixture_config();
    let overrides = Overrides {
        salary: Some(dec!(3000.00)),
        scenarios_file: Some(
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("irpf-data")
                .join("test-data")
                .join("scenarios.csv"),
        ),
        ..Overrides::default()
    };

    let comparisons = app::run(&config, &overrides).expect("run should succeed");

    assert_eq!(comparisons.len(), 3);
    assert!(
        comparisons
            .iter()
            .all(|c| c.input.gross_monthly_income == dec!(3000.00))
    );
}

#[test]
fn test_all_renderers_on_fixture() {
    let config = load_fixture_config();
    let comparisons = app::run(&config, &Overrides::default()).expect("run should succeed");
    let dir = tempfile::tempdir().expect("temp dir");

    let mut table = SummaryTable::new(Vec::new(), config.currency_symbol.clone());
    table.render(&comparisons).expect("table renders");
    let table_text = String::from_utf8(table.into_inner()).unwrap();
    assert!(table_text.contains("Two dependents"));
    assert!(table_text.contains("5,280.00"));

    let mut chart = BarChart::new(Vec::new(), 20, config.currency_symbol.clone());
    chart.render(&comparisons).expect("chart renders");
    let chart_text = String::from_utf8(chart.into_inner()).unwrap();
    assert!(chart_text.contains("Monthly Tax by Scenario"));
    assert!(chart_text.contains("R$ 440.00"));

    let mut exporter = WorkbookExporter::new(dir.path());
    exporter.render(&comparisons).expect("workbook exports");
    assert_eq!(exporter.written().len(), 4);

    let sheet = fs::read_to_string(dir.path().join("02-Two_dependents.csv")).unwrap();
    assert_eq!(
        sheet.lines().collect::<Vec<_>>(),
        vec![
            "Bracket,Rate (%),Bracket Base,Bracket Tax",
            "0.00 - 1000,0,1000,0",
            "1000.00 - inf,10,3810,381",
        ]
    );
}
