//! `dashboard` - evaluate one plan and print the report JSON.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dashboard_runtime::compare::compare_metrics;
use dashboard_runtime::config::DashboardConfig;
use dashboard_runtime::plan::PlanRequest;
use dashboard_runtime::report::{DashboardReport, ReportDocument};
use dashboard_runtime::session::DashboardSession;
use dashboard_runtime::sweep::sweep;
use dashboard_runtime::Result;

#[derive(Debug, Parser)]
#[command(name = "dashboard", about = "Derive dashboard metrics for an investment plan")]
struct Cli {
    /// Total investment budget. Defaults to 6.2% of uploaded revenue, or 620000.
    #[arg(long)]
    investment: Option<f64>,

    /// Timeline in weeks.
    #[arg(long)]
    timeline: Option<f64>,

    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Company data CSV.
    #[arg(long)]
    company: Option<PathBuf>,

    /// Include the change against a baseline plan `<investment>,<timeline>`.
    #[arg(long, value_parser = parse_pair)]
    compare_to: Option<(f64, f64)>,

    /// Print a sweep over these investments (comma-separated) instead of a report.
    #[arg(long, value_delimiter = ',')]
    sweep_investments: Vec<f64>,

    /// Timelines for `--sweep-investments` (comma-separated).
    #[arg(long, value_delimiter = ',', default_value = "6,12,16")]
    sweep_timelines: Vec<f64>,
}

fn parse_pair(raw: &str) -> std::result::Result<(f64, f64), String> {
    let (a, b) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected <investment>,<timeline>, got {:?}", raw))?;
    let a = a.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let b = b.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((a, b))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "dashboard failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    if !cli.sweep_investments.is_empty() {
        let points = sweep(&cli.sweep_investments, &cli.sweep_timelines, &config)?;
        serde_json::to_writer_pretty(io::stdout().lock(), &points)?;
        println!();
        return Ok(());
    }

    let mut session = DashboardSession::new(config);
    if let Some(path) = &cli.company {
        session.load_company_csv(&fs::read_to_string(path)?)?;
    }

    let request = PlanRequest {
        investment: cli.investment,
        timeline_weeks: cli.timeline,
    };
    let metrics = session.evaluate(&request)?.clone();
    let inputs = *session.current_inputs().ok_or(dashboard_runtime::RuntimeError::NoPlan)?;

    let comparison = match cli.compare_to {
        Some((investment, timeline)) => {
            let mut baseline_session = DashboardSession::new(session.config().clone());
            let baseline = baseline_session.evaluate(&PlanRequest::new(investment, timeline))?;
            Some(compare_metrics(baseline, &metrics))
        }
        None => None,
    };

    ReportDocument {
        report: DashboardReport::build(inputs, metrics)?,
        comparison,
    }
    .write_to(io::stdout().lock())
}
