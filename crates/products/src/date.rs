//! Date handling: ISO parsing, display formatting and revision-date derivation.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use finprod_core::{DomainError, DomainResult};

/// Wire and form format of a calendar day.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display format used by the product table.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse an ISO date (`2025-01-15`) or an ISO timestamp
/// (`2025-01-15T00:00:00.000Z`). Timestamps keep their own calendar day;
/// no timezone conversion is applied.
pub fn parse_iso_date(value: &str) -> DomainResult<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, ISO_DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }

    Err(DomainError::invalid_date(format!("'{value}' is not an ISO date")))
}

/// Render a stored ISO date as `DD/MM/YYYY`.
pub fn format_date(value: &str) -> DomainResult<String> {
    parse_iso_date(value).map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
}

/// The revision date of a product released on `release`: the same day one
/// year later. 29 February rolls over to 1 March when the next year is not
/// a leap year.
///
/// Returns `None` only past the end of the supported calendar.
pub fn revision_date_for(release: NaiveDate) -> Option<NaiveDate> {
    let next_year = release.year() + 1;
    release
        .with_year(next_year)
        .or_else(|| NaiveDate::from_ymd_opt(next_year, 3, 1))
}

/// Serde adapter for `NaiveDate` fields carried as ISO strings.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{ISO_DATE_FORMAT, parse_iso_date};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(ISO_DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_iso_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formats_iso_dates_for_display() {
        assert_eq!(format_date("2025-01-15").unwrap(), "15/01/2025");
        assert_eq!(format_date("2025-12-31").unwrap(), "31/12/2025");
    }

    #[test]
    fn formats_timestamps_without_shifting_the_day() {
        assert_eq!(format_date("2025-12-31T00:00:00.000Z").unwrap(), "31/12/2025");
        assert_eq!(format_date("2025-01-01T23:30:00-05:00").unwrap(), "01/01/2025");
    }

    #[test]
    fn format_rejects_non_iso_input() {
        assert!(matches!(format_date("31/12/2025"), Err(DomainError::InvalidDate(_))));
        assert!(format_date("").is_err());
    }

    #[test]
    fn revision_is_one_year_after_release() {
        assert_eq!(revision_date_for(ymd(2025, 1, 15)), Some(ymd(2026, 1, 15)));
        assert_eq!(revision_date_for(ymd(2025, 12, 31)), Some(ymd(2026, 12, 31)));
    }

    #[test]
    fn leap_day_rolls_over_to_march_first() {
        assert_eq!(revision_date_for(ymd(2024, 2, 29)), Some(ymd(2025, 3, 1)));
        assert_eq!(revision_date_for(ymd(2027, 2, 28)), Some(ymd(2028, 2, 28)));
    }
}
