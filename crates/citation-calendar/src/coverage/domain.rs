use crate::jurisdiction::Jurisdiction;
use chrono::NaiveDate;
use serde::Serialize;

/// One jurisdiction-day as seen by the coverage model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub date: NaiveDate,
    pub jurisdiction: Jurisdiction,
    pub citation_issued: u32,
}

impl Observation {
    pub fn new(date: NaiveDate, jurisdiction: Jurisdiction, citation_issued: u32) -> Self {
        Self {
            date,
            jurisdiction,
            citation_issued,
        }
    }

    /// Only days that issued at least one citation count as covered.
    pub fn is_qualifying(&self) -> bool {
        self.citation_issued != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Year,
    Month,
}

impl Granularity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Month => "Month",
        }
    }
}

/// Days expected but not observed for a year, or for one month of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageGap {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub missing_days: u32,
}

impl CoverageGap {
    pub fn month_name(&self) -> Option<&'static str> {
        let month = u8::try_from(self.month?).ok()?;
        chrono::Month::try_from(month).ok().map(|month| month.name())
    }
}
