use super::domain::{CoverageGap, Granularity, Observation};
use crate::calendar::{days_in_month, days_in_year, CalendarError};
use crate::jurisdiction::Jurisdiction;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Default, Clone)]
struct ObservedDays {
    /// Every year with at least one row, qualifying or not.
    years: BTreeSet<i32>,
    covered: BTreeSet<NaiveDate>,
}

/// Expected versus observed day counts for each jurisdiction.
#[derive(Debug, Default, Clone)]
pub struct CoverageModel {
    jurisdictions: BTreeMap<Jurisdiction, ObservedDays>,
}

impl CoverageModel {
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut model = Self::default();
        for observation in observations {
            let entry = model
                .jurisdictions
                .entry(observation.jurisdiction.clone())
                .or_default();
            entry.years.insert(observation.date.year());
            if observation.is_qualifying() {
                entry.covered.insert(observation.date);
            }
        }
        model
    }

    pub fn jurisdictions(&self) -> impl Iterator<Item = &Jurisdiction> {
        self.jurisdictions.keys()
    }

    /// Observed jurisdictions named `city`, narrowed to `state` when given.
    /// Case and surrounding whitespace are ignored.
    pub fn matching(&self, city: &str, state: Option<&str>) -> Vec<&Jurisdiction> {
        let city = city.trim().to_ascii_lowercase();
        let state = state.map(|state| state.trim().to_ascii_lowercase());
        self.jurisdictions
            .keys()
            .filter(|known| known.city == city)
            .filter(|known| state.as_ref().map_or(true, |state| &known.state == state))
            .collect()
    }

    /// Years with any rows for the jurisdiction, ascending.
    pub fn years(&self, jurisdiction: &Jurisdiction) -> Vec<i32> {
        self.observed(jurisdiction)
            .map(|observed| observed.years.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn expected_days_per_month(year: i32) -> Result<BTreeMap<u32, u32>, CalendarError> {
        (1..=12)
            .map(|month| days_in_month(year, month).map(|days| (month, days)))
            .collect()
    }

    pub fn expected_days_per_year(year: i32) -> Result<u32, CalendarError> {
        days_in_year(year)
    }

    pub fn actual_days_per_month(&self, jurisdiction: &Jurisdiction, year: i32, month: u32) -> u32 {
        let Some(observed) = self.observed(jurisdiction) else {
            return 0;
        };
        let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return 0;
        };
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };

        match end {
            Some(end) => observed.covered.range(start..end).count() as u32,
            None => observed.covered.range(start..).count() as u32,
        }
    }

    pub fn actual_days_per_year(&self, jurisdiction: &Jurisdiction, year: i32) -> u32 {
        self.observed(jurisdiction)
            .map(|observed| {
                observed
                    .covered
                    .iter()
                    .filter(|date| date.year() == year)
                    .count() as u32
            })
            .unwrap_or(0)
    }

    /// Gaps for every observed year of the jurisdiction, ordered by year then
    /// month. Fully covered years and months are left out.
    pub fn missing(
        &self,
        jurisdiction: &Jurisdiction,
        granularity: Granularity,
    ) -> Result<Vec<CoverageGap>, CalendarError> {
        let mut gaps = Vec::new();

        for year in self.years(jurisdiction) {
            match granularity {
                Granularity::Year => {
                    let expected = Self::expected_days_per_year(year)?;
                    let actual = self.actual_days_per_year(jurisdiction, year);
                    if expected != actual {
                        gaps.push(CoverageGap {
                            year,
                            month: None,
                            missing_days: expected.saturating_sub(actual),
                        });
                    }
                }
                Granularity::Month => {
                    for (month, expected) in Self::expected_days_per_month(year)? {
                        let actual = self.actual_days_per_month(jurisdiction, year, month);
                        if expected != actual {
                            gaps.push(CoverageGap {
                                year,
                                month: Some(month),
                                missing_days: expected.saturating_sub(actual),
                            });
                        }
                    }
                }
            }
        }

        debug!(
            jurisdiction = %jurisdiction,
            granularity = granularity.label(),
            gaps = gaps.len(),
            "computed coverage gaps"
        );

        Ok(gaps)
    }

    fn observed(&self, jurisdiction: &Jurisdiction) -> Option<&ObservedDays> {
        self.jurisdictions.get(jurisdiction)
    }
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
    fn duplicate_dates_count_once() {
        let model = CoverageModel::from_observations([
            Observation::new(date(2021, 3, 1), austin(), 4),
            Observation::new(date(2021, 3, 1), austin(), 2),
            Observation::new(date(2021, 3, 2), austin(), 1),
        ]);
        assert_eq!(model.actual_days_per_month(&austin(), 2021, 3), 2);
        assert_eq!(model.actual_days_per_year(&austin(), 2021), 2);
    }

    #[test]
    fn zero_citation_days_are_not_covered() {
        let model = CoverageModel::from_observations([
            Observation::new(date(2021, 3, 1), austin(), 0),
            Observation::new(date(2021, 3, 2), austin(), 3),
        ]);
        assert_eq!(model.actual_days_per_month(&austin(), 2021, 3), 1);
        assert_eq!(model.years(&austin()), vec![2021]);
    }

    #[test]
    fn unknown_keys_resolve_to_zero() {
        let model =
            CoverageModel::from_observations([Observation::new(date(2021, 3, 1), austin(), 1)]);
        let dallas = Jurisdiction::new("dallas", "tx");
        assert_eq!(model.actual_days_per_month(&dallas, 2021, 3), 0);
        assert_eq!(model.actual_days_per_month(&austin(), 2019, 3), 0);
        assert_eq!(model.actual_days_per_month(&austin(), 2021, 13), 0);
        assert_eq!(model.actual_days_per_year(&austin(), 1999), 0);
        assert!(model.years(&dallas).is_empty());
    }

    #[test]
    fn december_range_stops_at_new_year() {
        let model = CoverageModel::from_observations([
            Observation::new(date(2021, 12, 31), austin(), 1),
            Observation::new(date(2022, 1, 1), austin(), 1),
        ]);
        assert_eq!(model.actual_days_per_month(&austin(), 2021, 12), 1);
        assert_eq!(model.actual_days_per_month(&austin(), 2022, 1), 1);
    }

    #[test]
    fn lookups_ignore_case() {
        let model = CoverageModel::from_observations([Observation::new(
            date(2021, 3, 1),
            Jurisdiction::new("Austin", "TX"),
            1,
        )]);
        assert_eq!(
            model.actual_days_per_year(&Jurisdiction::new(" AUSTIN ", "tx"), 2021),
            1
        );
        assert_eq!(model.jurisdictions().collect::<Vec<_>>(), vec![&austin()]);
    }

    #[test]
    fn same_city_in_two_states_stays_separate() {
        let texas = Jurisdiction::new("springfield", "tx");
        let missouri = Jurisdiction::new("springfield", "mo");
        let model = CoverageModel::from_observations([
            Observation::new(date(2021, 1, 1), texas.clone(), 1),
            Observation::new(date(2021, 1, 2), missouri.clone(), 1),
        ]);

        assert_eq!(model.actual_days_per_month(&texas, 2021, 1), 1);
        assert_eq!(model.actual_days_per_month(&missouri, 2021, 1), 1);
        assert_eq!(model.matching("Springfield", None), vec![&missouri, &texas]);
        assert_eq!(model.matching("springfield", Some(" TX ")), vec![&texas]);
        assert!(model.matching("springfield", Some("il")).is_empty());
    }
}
