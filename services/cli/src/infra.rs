use chrono::NaiveDate;
use citation_calendar::calendar::FiscalYearConvention;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_convention(raw: &str) -> Result<FiscalYearConvention, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

/// "saint paul" -> "Saint Paul"
pub(crate) fn display_name(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2021-09-15 "),
            Ok(NaiveDate::from_ymd_opt(2021, 9, 15).unwrap())
        );
        assert!(parse_date("09/15/2021")
            .expect_err("wrong format")
            .contains("YYYY-MM-DD"));
    }

    #[test]
    fn parse_convention_accepts_known_values() {
        assert_eq!(parse_convention("aug31"), Ok(FiscalYearConvention::Aug31));
        assert!(parse_convention("dec31").is_err());
    }

    #[test]
    fn display_name_capitalizes_words() {
        assert_eq!(display_name("saint paul"), "Saint Paul");
        assert_eq!(display_name("austin"), "Austin");
    }
}
