use crate::calendar::{days_to_month_end, CalendarError, FiscalPosition, FiscalYearConvention};
use crate::coverage::Observation;
use crate::jurisdiction::Jurisdiction;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

/// Days before month-end that count as the end of the month.
pub const END_OF_MONTH_WINDOW: u32 = 5;
pub const END_OF_QUARTER_WINDOW: i64 = 10;
pub const END_OF_YEAR_WINDOW: i64 = 15;

/// Stop totals for a single day.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DailyCounts {
    pub total_activity: u32,
    pub citation_issued: u32,
}

/// One derived row per jurisdiction and day. Field order is the column order
/// of the processed CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub total_activity: u32,
    pub citation_issued: u32,
    /// NaN when the day had no stops.
    pub citation_rate: f64,
    /// Monday is 1.
    pub day_of_week: u32,
    pub month: u32,
    pub days_end_month: u32,
    pub end_of_month: bool,
    pub year: i32,
    pub days_end_year: i64,
    pub end_of_year: bool,
    pub quarter: u8,
    pub days_end_quarter: i64,
    pub end_of_quarter: bool,
    pub city: String,
    pub state: String,
}

impl DailyRecord {
    pub fn derive(
        date: NaiveDate,
        counts: DailyCounts,
        jurisdiction: &Jurisdiction,
        convention: FiscalYearConvention,
    ) -> Result<Self, CalendarError> {
        let citation_rate = if counts.total_activity == 0 {
            f64::NAN
        } else {
            f64::from(counts.citation_issued) / f64::from(counts.total_activity)
        };
        let days_end_month = days_to_month_end(date)?;
        let position = FiscalPosition::for_date(date, convention)?;

        Ok(Self {
            date,
            total_activity: counts.total_activity,
            citation_issued: counts.citation_issued.min(counts.total_activity),
            citation_rate,
            day_of_week: date.weekday().number_from_monday(),
            month: date.month(),
            days_end_month,
            end_of_month: days_end_month <= END_OF_MONTH_WINDOW,
            year: date.year(),
            days_end_year: position.days_to_fiscal_year_end,
            end_of_year: position.days_to_fiscal_year_end <= END_OF_YEAR_WINDOW,
            quarter: position.fiscal_quarter,
            days_end_quarter: position.days_to_fiscal_quarter_end,
            end_of_quarter: position.days_to_fiscal_quarter_end <= END_OF_QUARTER_WINDOW,
            city: jurisdiction.city.clone(),
            state: jurisdiction.state.clone(),
        })
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::new(&self.city, &self.state)
    }

    pub fn observation(&self) -> Observation {
        Observation::new(self.date, self.jurisdiction(), self.citation_issued)
    }
}

pub fn write_daily_records<P: AsRef<Path>>(
    path: P,
    records: &[DailyRecord],
) -> Result<(), csv::Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_daily_records_to(file, records)
}

pub fn write_daily_records_to<W: Write>(
    writer: W,
    records: &[DailyRecord],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read_daily_records<P: AsRef<Path>>(path: P) -> Result<Vec<DailyRecord>, csv::Error> {
    let file = std::fs::File::open(path)?;
    read_daily_records_from(file)
}

pub fn read_daily_records_from<R: Read>(reader: R) -> Result<Vec<DailyRecord>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn austin() -> Jurisdiction {
        Jurisdiction::new("austin", "tx")
    }

    #[test]
    fn derive_fills_calendar_features() {
        let counts = DailyCounts {
            total_activity: 40,
            citation_issued: 10,
        };
        let record =
            DailyRecord::derive(date(2021, 8, 27), counts, &austin(), FiscalYearConvention::Aug31)
                .expect("derives");

        assert_eq!(record.citation_rate, 0.25);
        assert_eq!(record.day_of_week, 5);
        assert_eq!(record.days_end_month, 4);
        assert!(record.end_of_month);
        assert_eq!(record.quarter, 4);
        assert_eq!(record.days_end_quarter, 4);
        assert!(record.end_of_quarter);
        assert_eq!(record.days_end_year, 4);
        assert!(record.end_of_year);
    }

    #[test]
    fn empty_day_has_nan_rate() {
        let record = DailyRecord::derive(
            date(2021, 1, 10),
            DailyCounts::default(),
            &austin(),
            FiscalYearConvention::Aug31,
        )
        .expect("derives");
        assert!(record.citation_rate.is_nan());
        assert_eq!(record.day_of_week, 7);
        assert!(!record.end_of_month);
    }

    #[test]
    fn records_survive_csv_export() {
        let counts = DailyCounts {
            total_activity: 3,
            citation_issued: 1,
        };
        let records = vec![
            DailyRecord::derive(date(2021, 3, 1), counts, &austin(), FiscalYearConvention::Aug31)
                .expect("derives"),
            DailyRecord::derive(
                date(2021, 3, 2),
                DailyCounts::default(),
                &austin(),
                FiscalYearConvention::Aug31,
            )
            .expect("derives"),
        ];

        let mut buffer = Vec::new();
        write_daily_records_to(&mut buffer, &records).expect("writes");
        let header = String::from_utf8(buffer.clone()).expect("utf8");
        assert!(header.starts_with("date,total_activity,citation_issued,citation_rate"));

        let restored = read_daily_records_from(buffer.as_slice()).expect("reads");
        assert_eq!(restored[0], records[0]);
        assert!(restored[1].citation_rate.is_nan());
        assert_eq!(restored[1].observation().citation_issued, 0);
    }

    fn saint_paul_on(day: NaiveDate) -> DailyRecord {
        DailyRecord::derive(
            day,
            DailyCounts::default(),
            &Jurisdiction::new("saint paul", "mn"),
            FiscalYearConvention::Jun30,
        )
        .expect("derives")
    }

    #[test]
    fn month_window_ends_at_five_days() {
        let inside = saint_paul_on(date(2021, 1, 26));
        assert_eq!(inside.days_end_month, 5);
        assert!(inside.end_of_month);

        let outside = saint_paul_on(date(2021, 1, 25));
        assert_eq!(outside.days_end_month, 6);
        assert!(!outside.end_of_month);
    }

    #[test]
    fn quarter_window_ends_at_ten_days() {
        let inside = saint_paul_on(date(2021, 12, 21));
        assert_eq!((inside.quarter, inside.days_end_quarter), (2, 10));
        assert!(inside.end_of_quarter);

        let outside = saint_paul_on(date(2021, 12, 20));
        assert_eq!(outside.days_end_quarter, 11);
        assert!(!outside.end_of_quarter);
    }

    #[test]
    fn year_window_ends_at_fifteen_days() {
        let inside = saint_paul_on(date(2021, 6, 15));
        assert_eq!(inside.days_end_year, 15);
        assert!(inside.end_of_year);

        let outside = saint_paul_on(date(2021, 6, 14));
        assert_eq!(outside.days_end_year, 16);
        assert!(!outside.end_of_year);
    }

    #[test]
    fn observation_keeps_the_state() {
        let record = saint_paul_on(date(2021, 6, 14));
        let observation = record.observation();
        assert_eq!(
            observation.jurisdiction,
            Jurisdiction::new("saint paul", "mn")
        );
        assert_eq!(observation.date, date(2021, 6, 14));
    }
}
