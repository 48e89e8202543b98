use crate::pipeline::{run_process, ProcessArgs};
use crate::report::{run_coverage_report, run_fiscal_report, CoverageArgs, FiscalArgs};
use citation_calendar::config::AppConfig;
use citation_calendar::error::AppError;
use citation_calendar::telemetry;
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "citation-calendar",
    about = "Derive fiscal-calendar features from traffic citation logs and report data gaps",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate raw event logs into the processed daily CSV
    Process(ProcessArgs),
    /// Report days missing from a city's citation data
    Coverage(CoverageArgs),
    /// Show where a date falls in its fiscal year and quarter
    Fiscal(FiscalArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Process(args) => run_process(args, &config),
        Command::Coverage(args) => run_coverage_report(args, &config),
        Command::Fiscal(args) => run_fiscal_report(args, &config),
    }
}
