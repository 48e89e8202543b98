//! Calendar features and coverage gaps for daily traffic-citation records.
//!
//! [`calendar`] answers where a date sits in its jurisdiction's fiscal year
//! and quarter. [`coverage`] compares observed days against the calendar to
//! find holes in the data, and [`ingest`] turns raw per-stop event logs into
//! the daily records both of them work from.

pub mod calendar;
pub mod config;
pub mod coverage;
pub mod error;
pub mod ingest;
pub mod jurisdiction;
pub mod telemetry;

pub use calendar::{
    fiscal_quarter_and_distance, fiscal_year_end_distance, CalendarError, FiscalPosition,
    FiscalYearConvention,
};
pub use coverage::{CoverageGap, CoverageModel, CoverageSummary, Granularity, Observation};
pub use ingest::{DailyRecord, EventLogImporter};
pub use jurisdiction::{ConventionTable, Jurisdiction};
