mod daily;
mod parser;
mod source;

pub use daily::{
    read_daily_records, read_daily_records_from, write_daily_records, write_daily_records_to,
    DailyCounts, DailyRecord, END_OF_MONTH_WINDOW, END_OF_QUARTER_WINDOW, END_OF_YEAR_WINDOW,
};
pub use source::{discover_sources, SourceFile, SourceFileError};

use crate::calendar::CalendarError;
use crate::jurisdiction::{ConventionTable, Jurisdiction};
use chrono::NaiveDate;
use parser::{ParseOutcome, StopEvent};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Undated rows are dropped only while there are fewer than this many.
pub const MAX_DROPPED_ROWS: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read event log: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid event CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("event log has no '{0}' column")]
    MissingColumn(&'static str),
    #[error(
        "{invalid} rows have no usable date; at most {max} can be dropped",
        max = MAX_DROPPED_ROWS
    )]
    TooManyInvalidRows { invalid: usize },
    #[error("daily totals account for {grouped} stops but {parsed} were read")]
    ActivityMismatch { parsed: u64, grouped: u64 },
    #[error(transparent)]
    Source(#[from] SourceFileError),
    #[error("could not derive calendar features: {0}")]
    Calendar(#[from] CalendarError),
}

/// Turns raw per-stop event logs into daily records with calendar features.
#[derive(Debug, Clone, Default)]
pub struct EventLogImporter {
    conventions: ConventionTable,
}

impl EventLogImporter {
    pub fn new(conventions: ConventionTable) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> &ConventionTable {
        &self.conventions
    }

    /// Imports every source under `dir`, in path order.
    pub fn import_directory<P: AsRef<Path>>(
        &self,
        dir: P,
    ) -> Result<Vec<DailyRecord>, ImportError> {
        let sources = discover_sources(dir)?;
        let total = sources.len();
        let mut records = Vec::new();

        for (index, source) in sources.iter().enumerate() {
            info!(
                file = %source.path.display(),
                jurisdiction = %source.jurisdiction,
                "reading event log ({} of {})",
                index + 1,
                total
            );
            records.extend(self.import_file(source)?);
        }

        Ok(records)
    }

    pub fn import_file(&self, source: &SourceFile) -> Result<Vec<DailyRecord>, ImportError> {
        let file = std::fs::File::open(&source.path)?;
        self.import_reader(file, &source.jurisdiction)
    }

    pub fn import_reader<R: Read>(
        &self,
        reader: R,
        jurisdiction: &Jurisdiction,
    ) -> Result<Vec<DailyRecord>, ImportError> {
        let parsed = match parser::parse_events(reader)? {
            ParseOutcome::Parsed(parsed) => parsed,
            ParseOutcome::MissingColumn(column) => return Err(ImportError::MissingColumn(column)),
        };

        if parsed.invalid_rows > MAX_DROPPED_ROWS {
            return Err(ImportError::TooManyInvalidRows {
                invalid: parsed.invalid_rows,
            });
        }
        if parsed.invalid_rows > 0 {
            warn!(
                jurisdiction = %jurisdiction,
                dropped = parsed.invalid_rows,
                "dropping event rows without a usable date"
            );
        }

        let daily = group_by_day(&parsed.events);
        // Every parsed event lands in exactly one day.
        let grouped: u64 = daily
            .values()
            .map(|counts| u64::from(counts.total_activity))
            .sum();
        let read = parsed.events.len() as u64;
        if grouped != read {
            return Err(ImportError::ActivityMismatch {
                parsed: read,
                grouped,
            });
        }

        let convention = self.conventions.convention_for(jurisdiction);
        daily
            .into_iter()
            .map(|(date, counts)| {
                DailyRecord::derive(date, counts, jurisdiction, convention)
                    .map_err(ImportError::from)
            })
            .collect()
    }
}

fn group_by_day(events: &[StopEvent]) -> BTreeMap<NaiveDate, DailyCounts> {
    let mut daily: BTreeMap<NaiveDate, DailyCounts> = BTreeMap::new();
    for event in events {
        let counts = daily.entry(event.date).or_default();
        counts.total_activity += 1;
        if event.citation_issued {
            counts.citation_issued += 1;
        }
    }
    daily
}
