use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which calendar day closes a jurisdiction's fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiscalYearConvention {
    /// Fiscal year ends on 30 June.
    Jun30,
    /// Fiscal year ends on 31 August.
    Aug31,
}

impl FiscalYearConvention {
    pub const fn ordered() -> [Self; 2] {
        [Self::Jun30, Self::Aug31]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Jun30 => "June 30 year-end",
            Self::Aug31 => "August 31 year-end",
        }
    }

    /// `(month, day)` of the fiscal year-end.
    pub const fn year_end(self) -> (u32, u32) {
        match self {
            Self::Jun30 => (6, 30),
            Self::Aug31 => (8, 31),
        }
    }
}

impl fmt::Display for FiscalYearConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jun30 => write!(f, "jun30"),
            Self::Aug31 => write!(f, "aug31"),
        }
    }
}

impl FromStr for FiscalYearConvention {
    type Err = CalendarError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jun30" | "jun_30" | "june30" | "06-30" => Ok(Self::Jun30),
            "aug31" | "aug_31" | "august31" | "08-31" => Ok(Self::Aug31),
            _ => Err(CalendarError::UnsupportedConvention(value.to_owned())),
        }
    }
}

/// Where a date sits relative to its fiscal year and fiscal quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FiscalPosition {
    pub days_to_fiscal_year_end: i64,
    pub fiscal_quarter: u8,
    pub days_to_fiscal_quarter_end: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("unsupported fiscal year convention '{0}' (expected jun30 or aug31)")]
    UnsupportedConvention(String),
    #[error("month {0} is outside 1-12")]
    MonthOutOfRange(u32),
    #[error("no calendar date exists for {year}-{month:02}-{day:02}")]
    DateOutOfRange { year: i32, month: u32, day: u32 },
}

pub(crate) fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(CalendarError::DateOutOfRange { year, month, day })
}
