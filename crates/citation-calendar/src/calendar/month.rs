use super::domain::{ymd, CalendarError};
use chrono::{Datelike, NaiveDate};

fn first_of_next_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    if month == 12 {
        ymd(year + 1, 1, 1)
    } else {
        ymd(year, month + 1, 1)
    }
}

/// Length of a calendar month, measured as the gap between its first day and
/// the first day of the following month.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::MonthOutOfRange(month));
    }

    let start = ymd(year, month, 1)?;
    let next = first_of_next_month(year, month)?;
    Ok((next - start).num_days() as u32)
}

pub fn days_in_year(year: i32) -> Result<u32, CalendarError> {
    let start = ymd(year, 1, 1)?;
    let next = ymd(year + 1, 1, 1)?;
    Ok((next - start).num_days() as u32)
}

/// Days left in the month after `date`; zero on the last day.
pub fn days_to_month_end(date: NaiveDate) -> Result<u32, CalendarError> {
    Ok(days_in_month(date.year(), date.month())? - date.day())
}
