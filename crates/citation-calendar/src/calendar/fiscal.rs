use super::domain::{ymd, CalendarError, FiscalPosition, FiscalYearConvention};
use chrono::{Datelike, NaiveDate};

/// The fiscal year-end that closes the fiscal year containing `date`.
///
/// A date falling exactly on the year-end belongs to the year it closes; only
/// dates strictly after it roll over to the following year's boundary.
pub fn fiscal_year_end(
    date: NaiveDate,
    convention: FiscalYearConvention,
) -> Result<NaiveDate, CalendarError> {
    let (month, day) = convention.year_end();
    let this_year = ymd(date.year(), month, day)?;
    if date > this_year {
        ymd(date.year() + 1, month, day)
    } else {
        Ok(this_year)
    }
}

/// Whole days from `date` until its fiscal year-end. Zero on the boundary.
pub fn fiscal_year_end_distance(
    date: NaiveDate,
    convention: FiscalYearConvention,
) -> Result<i64, CalendarError> {
    let year_end = fiscal_year_end(date, convention)?;
    Ok((year_end - date).num_days())
}

/// Returns `(days_to_quarter_end, quarter)` with quarters numbered 1-4 from
/// the start of the fiscal year.
pub fn fiscal_quarter_and_distance(
    date: NaiveDate,
    convention: FiscalYearConvention,
) -> Result<(i64, u8), CalendarError> {
    let (quarter_end, quarter) = quarter_boundary(date.year(), date.month(), convention)?;
    Ok(((quarter_end - date).num_days(), quarter))
}

fn quarter_boundary(
    year: i32,
    month: u32,
    convention: FiscalYearConvention,
) -> Result<(NaiveDate, u8), CalendarError> {
    match convention {
        FiscalYearConvention::Aug31 => match month {
            9..=11 => Ok((ymd(year, 11, 30)?, 1)),
            // Q2 straddles the new year and closes on the last day of February.
            12 => Ok((end_of_february(year + 1)?, 2)),
            1 | 2 => Ok((end_of_february(year)?, 2)),
            3..=5 => Ok((ymd(year, 5, 31)?, 3)),
            6..=8 => Ok((ymd(year, 8, 31)?, 4)),
            other => Err(CalendarError::MonthOutOfRange(other)),
        },
        FiscalYearConvention::Jun30 => match month {
            7..=9 => Ok((ymd(year, 9, 30)?, 1)),
            10..=12 => Ok((ymd(year, 12, 31)?, 2)),
            1..=3 => Ok((ymd(year, 3, 31)?, 3)),
            4..=6 => Ok((ymd(year, 6, 30)?, 4)),
            other => Err(CalendarError::MonthOutOfRange(other)),
        },
    }
}

/// The day before 1 March, so leap years resolve without a 28/29 table.
fn end_of_february(year: i32) -> Result<NaiveDate, CalendarError> {
    ymd(year, 3, 1)?
        .pred_opt()
        .ok_or(CalendarError::DateOutOfRange {
            year,
            month: 2,
            day: 28,
        })
}

impl FiscalPosition {
    pub fn for_date(
        date: NaiveDate,
        convention: FiscalYearConvention,
    ) -> Result<Self, CalendarError> {
        let days_to_fiscal_year_end = fiscal_year_end_distance(date, convention)?;
        let (days_to_fiscal_quarter_end, fiscal_quarter) =
            fiscal_quarter_and_distance(date, convention)?;

        Ok(Self {
            days_to_fiscal_year_end,
            fiscal_quarter,
            days_to_fiscal_quarter_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn boundary_day_is_zero_distance() {
        assert_eq!(
            fiscal_year_end_distance(date(2021, 8, 31), FiscalYearConvention::Aug31),
            Ok(0)
        );
        assert_eq!(
            fiscal_year_end_distance(date(2021, 6, 30), FiscalYearConvention::Jun30),
            Ok(0)
        );
    }

    #[test]
    fn day_after_boundary_rolls_to_next_year() {
        assert_eq!(
            fiscal_year_end(date(2021, 9, 1), FiscalYearConvention::Aug31),
            Ok(date(2022, 8, 31))
        );
        assert_eq!(
            fiscal_year_end_distance(date(2021, 7, 1), FiscalYearConvention::Jun30),
            Ok(364)
        );
    }

    #[test]
    fn quarter_boundary_covers_every_month() {
        for convention in FiscalYearConvention::ordered() {
            for month in 1..=12 {
                let (end, quarter) =
                    quarter_boundary(2023, month, convention).expect("month is covered");
                assert!((1..=4).contains(&quarter));
                assert!(end >= date(2023, month, 1), "{convention} month {month}");
            }
        }
    }

    #[test]
    fn quarter_boundary_rejects_invalid_month() {
        assert_eq!(
            quarter_boundary(2023, 13, FiscalYearConvention::Aug31),
            Err(CalendarError::MonthOutOfRange(13))
        );
        assert_eq!(
            quarter_boundary(2023, 0, FiscalYearConvention::Jun30),
            Err(CalendarError::MonthOutOfRange(0))
        );
    }

    #[test]
    fn end_of_february_handles_century_rules() {
        assert_eq!(end_of_february(1900), Ok(date(1900, 2, 28)));
        assert_eq!(end_of_february(2000), Ok(date(2000, 2, 29)));
    }

    #[test]
    fn position_combines_year_and_quarter() {
        let position =
            FiscalPosition::for_date(date(2021, 12, 15), FiscalYearConvention::Aug31).unwrap();
        assert_eq!(position.fiscal_quarter, 2);
        assert_eq!(position.days_to_fiscal_quarter_end, 75);
        assert_eq!(position.days_to_fiscal_year_end, 259);
    }
}
