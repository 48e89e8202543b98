use crate::infra::{display_name, parse_convention, parse_date};
use chrono::NaiveDate;
use citation_calendar::calendar::{fiscal_year_end, FiscalPosition, FiscalYearConvention};
use citation_calendar::config::AppConfig;
use citation_calendar::coverage::{CoverageModel, CoverageSummary};
use citation_calendar::error::AppError;
use citation_calendar::ingest::read_daily_records;
use citation_calendar::jurisdiction::Jurisdiction;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct CoverageArgs {
    /// City to report on, as it appears in the processed CSV
    #[arg(long)]
    pub(crate) city: String,
    /// State of the city, needed when the same city name appears under several states
    #[arg(long)]
    pub(crate) state: Option<String>,
    /// Processed daily CSV (defaults to CITATION_OUTPUT_PATH)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Emit the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct FiscalArgs {
    /// Date to evaluate (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: NaiveDate,
    /// State whose fiscal convention applies
    #[arg(long, conflicts_with = "convention")]
    pub(crate) state: Option<String>,
    /// Explicit convention (jun30 or aug31)
    #[arg(long, value_parser = parse_convention)]
    pub(crate) convention: Option<FiscalYearConvention>,
    /// Emit the position as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_coverage_report(args: CoverageArgs, config: &AppConfig) -> Result<(), AppError> {
    let CoverageArgs {
        city,
        state,
        input,
        json,
    } = args;
    let input = input.unwrap_or_else(|| config.pipeline.output_path.clone());

    let records = read_daily_records(&input)?;
    info!(records = records.len(), input = %input.display(), "loaded daily records");

    let model = CoverageModel::from_observations(records.iter().map(|record| record.observation()));
    let jurisdiction = resolve_jurisdiction(&model, &city, state.as_deref())?;

    let summary = model.summary(&jurisdiction)?;
    if json {
        print_json(&summary)?;
    } else {
        render_coverage_report(&summary);
    }

    Ok(())
}

/// Picks the one observed jurisdiction matching the requested city and
/// optional state.
pub(crate) fn resolve_jurisdiction(
    model: &CoverageModel,
    city: &str,
    state: Option<&str>,
) -> Result<Jurisdiction, AppError> {
    let mut matches = model.matching(city, state);
    match matches.len() {
        0 => Err(AppError::UnknownJurisdiction(match state {
            Some(state) => format!("{}, {}", city.trim(), state.trim()),
            None => city.trim().to_string(),
        })),
        1 => Ok(matches.remove(0).clone()),
        _ => Err(AppError::AmbiguousJurisdiction {
            city: city.trim().to_string(),
            states: matches
                .into_iter()
                .map(|jurisdiction| jurisdiction.state.clone())
                .collect(),
        }),
    }
}

pub(crate) fn render_coverage_report(summary: &CoverageSummary) {
    let city = format!(
        "{}, {}",
        display_name(&summary.jurisdiction.city),
        summary.jurisdiction.state.to_ascii_uppercase()
    );

    if summary.is_complete() {
        println!("{} has a citation on every day of every observed year.", city);
        return;
    }

    println!("Missing days for {} by year", city);
    for gap in &summary.yearly {
        println!("- {}: {}", gap.year, gap.missing_days);
    }

    println!("\nMissing days for {} by month", city);
    for (year, gaps) in summary.monthly_by_year() {
        println!("\n{}", year);
        for gap in gaps {
            println!(
                "- {}: {}",
                gap.month_name().unwrap_or("Unknown"),
                gap.missing_days
            );
        }
    }

    println!(
        "\n{} is missing {} of {} days ({:.2}%).",
        city,
        summary.total_missing_days,
        summary.total_expected_days,
        summary.missing_pct()
    );
    if let Some(worst) = summary.highest_missing_month {
        println!(
            "Most missing month: {} {} with {} days.",
            worst.month_name().unwrap_or("Unknown"),
            worst.year,
            worst.missing_days
        );
    }
}

#[derive(Debug, Serialize)]
struct FiscalReport {
    date: NaiveDate,
    convention: FiscalYearConvention,
    fiscal_year_end: NaiveDate,
    #[serde(flatten)]
    position: FiscalPosition,
}

pub(crate) fn run_fiscal_report(args: FiscalArgs, config: &AppConfig) -> Result<(), AppError> {
    let FiscalArgs {
        date,
        state,
        convention,
        json,
    } = args;

    let table = config.fiscal.convention_table();
    let convention = match (convention, state.as_deref()) {
        (Some(convention), _) => convention,
        (None, Some(state)) => table.convention_for_state(state),
        (None, None) => table.default_convention(),
    };

    let report = FiscalReport {
        date,
        convention,
        fiscal_year_end: fiscal_year_end(date, convention)?,
        position: FiscalPosition::for_date(date, convention)?,
    };

    if json {
        return print_json(&report);
    }

    println!("{} under the {} convention", report.date, convention.label());
    println!(
        "- Fiscal year ends {} ({} days away)",
        report.fiscal_year_end, report.position.days_to_fiscal_year_end
    );
    println!(
        "- Fiscal quarter Q{} ends in {} days",
        report.position.fiscal_quarter, report.position.days_to_fiscal_quarter_end
    );

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use citation_calendar::coverage::Observation;
    use serde::ser::Error as _;

    fn springfields() -> CoverageModel {
        let day = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        CoverageModel::from_observations([
            Observation::new(day, Jurisdiction::new("springfield", "tx"), 1),
            Observation::new(day, Jurisdiction::new("springfield", "mo"), 1),
            Observation::new(day, Jurisdiction::new("austin", "tx"), 1),
        ])
    }

    #[test]
    fn unique_city_resolves_without_state() {
        let jurisdiction =
            resolve_jurisdiction(&springfields(), " Austin ", None).expect("austin is known");
        assert_eq!(jurisdiction, Jurisdiction::new("austin", "tx"));
    }

    #[test]
    fn shared_city_name_needs_a_state() {
        let error = resolve_jurisdiction(&springfields(), "springfield", None)
            .expect_err("two springfields");
        match error {
            AppError::AmbiguousJurisdiction { city, states } => {
                assert_eq!(city, "springfield");
                assert_eq!(states, vec!["mo", "tx"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let jurisdiction = resolve_jurisdiction(&springfields(), "springfield", Some("MO"))
            .expect("state narrows the match");
        assert_eq!(jurisdiction, Jurisdiction::new("springfield", "mo"));
    }

    #[test]
    fn unknown_city_or_state_is_reported() {
        assert!(matches!(
            resolve_jurisdiction(&springfields(), "dallas", None),
            Err(AppError::UnknownJurisdiction(city)) if city == "dallas"
        ));
        assert!(matches!(
            resolve_jurisdiction(&springfields(), "austin", Some("mn")),
            Err(AppError::UnknownJurisdiction(city)) if city == "austin, mn"
        ));
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refused"))
        }
    }

    #[test]
    fn json_failures_surface_as_errors() {
        let error = print_json(&Unserializable).expect_err("serialization fails");
        assert!(matches!(error, AppError::Serialization(_)));
    }
}
