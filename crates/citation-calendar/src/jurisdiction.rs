use crate::calendar::FiscalYearConvention;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A city and the state it reports under. Names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Jurisdiction {
    pub city: String,
    pub state: String,
}

impl Jurisdiction {
    pub fn new(city: impl AsRef<str>, state: impl AsRef<str>) -> Self {
        Self {
            city: normalize(city.as_ref()),
            state: normalize(state.as_ref()),
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

/// Maps states onto the fiscal year convention their cities budget by.
#[derive(Debug, Clone)]
pub struct ConventionTable {
    by_state: HashMap<String, FiscalYearConvention>,
    default: FiscalYearConvention,
}

impl ConventionTable {
    pub fn new(default: FiscalYearConvention) -> Self {
        Self {
            by_state: HashMap::new(),
            default,
        }
    }

    /// Texas (by name or postal code) closes its fiscal year on 31 August;
    /// everyone else on 30 June.
    pub fn standard() -> Self {
        Self::new(FiscalYearConvention::Jun30)
            .with_state("texas", FiscalYearConvention::Aug31)
            .with_state("tx", FiscalYearConvention::Aug31)
    }

    pub fn with_state(mut self, state: &str, convention: FiscalYearConvention) -> Self {
        self.by_state.insert(normalize(state), convention);
        self
    }

    pub fn default_convention(&self) -> FiscalYearConvention {
        self.default
    }

    pub fn convention_for_state(&self, state: &str) -> FiscalYearConvention {
        self.by_state
            .get(&normalize(state))
            .copied()
            .unwrap_or(self.default)
    }

    pub fn convention_for(&self, jurisdiction: &Jurisdiction) -> FiscalYearConvention {
        self.convention_for_state(&jurisdiction.state)
    }
}

impl Default for ConventionTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_routes_texas_to_august() {
        let table = ConventionTable::standard();
        assert_eq!(
            table.convention_for_state("Texas"),
            FiscalYearConvention::Aug31
        );
        assert_eq!(table.convention_for_state(" TX "), FiscalYearConvention::Aug31);
        assert_eq!(table.convention_for_state("mn"), FiscalYearConvention::Jun30);
    }

    #[test]
    fn jurisdiction_names_are_normalized() {
        let jurisdiction = Jurisdiction::new(" Austin", "TX ");
        assert_eq!(jurisdiction.city, "austin");
        assert_eq!(jurisdiction.state, "tx");
        assert_eq!(jurisdiction.to_string(), "austin, tx");
    }

    #[test]
    fn custom_default_applies_to_unlisted_states() {
        let table = ConventionTable::new(FiscalYearConvention::Aug31)
            .with_state("minnesota", FiscalYearConvention::Jun30);
        assert_eq!(
            table.convention_for(&Jurisdiction::new("st paul", "Minnesota")),
            FiscalYearConvention::Jun30
        );
        assert_eq!(
            table.convention_for(&Jurisdiction::new("austin", "tx")),
            FiscalYearConvention::Aug31
        );
    }
}
