use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{debug, info};

use irpf_cli::app::{self, Overrides};
use irpf_cli::config::SimulatorConfig;
use irpf_cli::logging;
use irpf_cli::report::{BarChart, ReportRenderer, SummaryTable, WorkbookExporter};
use irpf_cli::utils::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income-tax simulator.
///
/// Compares the monthly tax of one or more deduction scenarios that share a
/// gross monthly income, prints a summary table and bar charts, and can export
/// the results as a workbook of CSV sheets.
#[derive(Debug, Parser)]
#[command(name = "irpf-sim", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario CSV file; replaces the scenarios in the config file.
    #[arg(short, long)]
    scenarios: Option<PathBuf>,

    /// Gross monthly income shared by every scenario (e.g. `5,000.00`).
    #[arg(long, value_parser = parse_decimal)]
    salary: Option<Decimal>,

    /// Bracket schedule CSV; the built-in monthly schedule when omitted.
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Directory to export `summary.csv` and one sheet per scenario into.
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Skip the bar charts.
    #[arg(long, default_value_t = false)]
    no_charts: bool,

    /// Length of the longest bar in the charts.
    #[arg(long, default_value_t = 40)]
    chart_width: usize,

    /// Log filter, e.g. `debug` or `warn,irpf_core=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    /// Append log records to this file as well.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => SimulatorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => {
            debug!("no config file given, using defaults");
            SimulatorConfig::default()
        }
    };

    let overrides = Overrides {
        salary: cli.salary,
        scenarios_file: cli.scenarios,
        brackets_file: cli.brackets,
    };

    let comparisons = app::run(&config, &overrides)?;

    let mut renderers: Vec<Box<dyn ReportRenderer>> = vec![Box::new(SummaryTable::new(
        io::stdout(),
        config.currency_symbol.clone(),
    ))];
    if !cli.no_charts {
        renderers.push(Box::new(BarChart::new(
            io::stdout(),
            cli.chart_width,
            config.currency_symbol.clone(),
        )));
    }
    if let Some(dir) = &cli.export_dir {
        renderers.push(Box::new(WorkbookExporter::new(dir)));
    }

    for renderer in &mut renderers {
        renderer
            .render(&comparisons)
            .context("Failed to render report")?;
    }

    if let Some(dir) = &cli.export_dir {
        info!("workbook written to {}", dir.display());
    }

    Ok(())
}
