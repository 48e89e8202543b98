use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One traffic stop from a raw event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StopEvent {
    pub(crate) date: NaiveDate,
    pub(crate) citation_issued: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ParsedEvents {
    pub(crate) events: Vec<StopEvent>,
    /// Rows whose date was blank or unreadable.
    pub(crate) invalid_rows: usize,
}

pub(crate) enum ParseOutcome {
    Parsed(ParsedEvents),
    MissingColumn(&'static str),
}

pub(crate) fn parse_events<R: Read>(reader: R) -> Result<ParseOutcome, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let has_date = csv_reader
        .headers()?
        .iter()
        .any(|header| header.trim_start_matches('\u{feff}') == "date");
    if !has_date {
        return Ok(ParseOutcome::MissingColumn("date"));
    }

    let mut parsed = ParsedEvents::default();
    for record in csv_reader.deserialize::<EventRow>() {
        let row = record?;
        match row.date.as_deref().and_then(parse_date) {
            Some(date) => parsed.events.push(StopEvent {
                date,
                citation_issued: row.citation_flag(),
            }),
            None => parsed.invalid_rows += 1,
        }
    }

    Ok(ParseOutcome::Parsed(parsed))
}

#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(alias = "\u{feff}date", default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    citation_issued: Option<String>,
}

impl EventRow {
    /// Missing values count as no citation; anything else that is not an
    /// explicit false or zero counts as one.
    fn citation_flag(&self) -> bool {
        match self.citation_issued.as_deref() {
            None => false,
            Some(value) => !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "" | "na" | "nan" | "false" | "f" | "0" | "0.0"
            ),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}
