use super::domain::{CoverageGap, Granularity};
use super::model::CoverageModel;
use crate::calendar::CalendarError;
use crate::jurisdiction::Jurisdiction;
use serde::Serialize;
use std::cmp::Reverse;

/// Year and month gaps for a jurisdiction, plus the totals the coverage
/// report prints.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageSummary {
    pub jurisdiction: Jurisdiction,
    pub yearly: Vec<CoverageGap>,
    pub monthly: Vec<CoverageGap>,
    pub total_missing_days: u32,
    pub total_expected_days: u32,
    pub missing_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_missing_month: Option<CoverageGap>,
}

impl CoverageSummary {
    /// Share of expected days missing, as a percentage rounded to 2 places.
    pub fn missing_pct(&self) -> f64 {
        (self.missing_ratio * 100.0 * 100.0).round() / 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.yearly.is_empty() && self.monthly.is_empty()
    }

    /// Monthly gaps grouped per year, in year order.
    pub fn monthly_by_year(&self) -> Vec<(i32, Vec<CoverageGap>)> {
        let mut grouped: Vec<(i32, Vec<CoverageGap>)> = Vec::new();
        for gap in &self.monthly {
            match grouped.last_mut() {
                Some((year, gaps)) if *year == gap.year => gaps.push(*gap),
                _ => grouped.push((gap.year, vec![*gap])),
            }
        }
        grouped
    }
}

impl CoverageModel {
    pub fn summary(&self, jurisdiction: &Jurisdiction) -> Result<CoverageSummary, CalendarError> {
        let yearly = self.missing(jurisdiction, Granularity::Year)?;
        let monthly = self.missing(jurisdiction, Granularity::Month)?;

        let total_missing_days = yearly.iter().map(|gap| gap.missing_days).sum();
        let total_expected_days = self
            .years(jurisdiction)
            .into_iter()
            .map(Self::expected_days_per_year)
            .sum::<Result<u32, CalendarError>>()?;
        let missing_ratio = if total_expected_days > 0 {
            f64::from(total_missing_days) / f64::from(total_expected_days)
        } else {
            0.0
        };

        // Ties go to the earliest month.
        let highest_missing_month = monthly
            .iter()
            .copied()
            .max_by_key(|gap| (gap.missing_days, Reverse((gap.year, gap.month))));

        Ok(CoverageSummary {
            jurisdiction: jurisdiction.clone(),
            yearly,
            monthly,
            total_missing_days,
            total_expected_days,
            missing_ratio,
            highest_missing_month,
        })
    }
}
