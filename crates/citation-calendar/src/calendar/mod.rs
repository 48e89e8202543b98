pub mod domain;
mod fiscal;
mod month;

pub use domain::{CalendarError, FiscalPosition, FiscalYearConvention};
pub use fiscal::{fiscal_quarter_and_distance, fiscal_year_end, fiscal_year_end_distance};
pub use month::{days_in_month, days_in_year, days_to_month_end};
