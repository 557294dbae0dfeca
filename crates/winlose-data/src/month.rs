//! Calendar month identifiers.

use crate::error::{DataError, Result};
use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format used for start dates on the command line, e.g. `08/2009`.
pub const START_DATE_FORMAT: &str = "%m/%Y";

/// A calendar month, represented by its first day.
///
/// Prices are recorded once per month, so every date read from input is
/// truncated to the first of its month before being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "NaiveDate")]
pub struct Month(NaiveDate);

impl Month {
    /// Create a month from a year and a 1-based month number.
    ///
    /// Returns `None` if the month number is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use winlose_data::Month;
    ///
    /// let month = Month::new(2009, 8).unwrap();
    /// assert_eq!(month.to_string(), "Aug-2009");
    /// assert!(Month::new(2009, 13).is_none());
    /// ```
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Truncate a date to the first day of its month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Parse a month using a chrono format string.
    ///
    /// Formats without a day-of-month field (such as `%b-%y`) are accepted;
    /// the day defaults to the first. Formats with a day are accepted too and
    /// the day is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidDate`] if the text does not match the format.
    pub fn parse(value: &str, date_format: &str) -> Result<Self> {
        let value = value.trim();
        let invalid = || DataError::InvalidDate {
            value: value.to_string(),
            format: date_format.to_string(),
        };

        if let Ok(date) = NaiveDate::parse_from_str(value, date_format) {
            return Ok(Self::from_date(date));
        }

        // Month-only formats leave the day unset, which NaiveDate refuses.
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, value, StrftimeItems::new(date_format))
            .map_err(|_| invalid())?;
        parsed.set_day(1).map_err(|_| invalid())?;
        parsed
            .to_naive_date()
            .map(Self::from_date)
            .map_err(|_| invalid())
    }

    /// First day of the month.
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month number (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl FromStr for Month {
    type Err = DataError;

    /// Parse a `MM/YYYY` start date.
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, START_DATE_FORMAT)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%b-%Y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Aug-09", "%b-%y", 2009, 8)]
    #[case("Mar-99", "%b-%y", 1999, 3)]
    #[case("8/1/2009", "%m/%d/%Y", 2009, 8)]
    #[case("8/17/2009", "%m/%d/%Y", 2009, 8)]
    #[case("10/2005", "%m/%Y", 2005, 10)]
    #[case("  Jan-10 ", "%b-%y", 2010, 1)]
    fn test_parse_truncates_to_first_of_month(
        #[case] value: &str,
        #[case] format: &str,
        #[case] year: i32,
        #[case] month: u32,
    ) {
        let parsed = Month::parse(value, format).unwrap();
        assert_eq!(parsed, Month::new(year, month).unwrap());
        assert_eq!(parsed.date().day(), 1);
    }

    #[rstest]
    #[case("", "%b-%y")]
    #[case("Foo-09", "%b-%y")]
    #[case("13/2009", "%m/%Y")]
    fn test_parse_rejects_bad_dates(#[case] value: &str, #[case] format: &str) {
        let err = Month::parse(value, format).unwrap_err();
        assert!(matches!(err, DataError::InvalidDate { .. }));
    }

    #[test]
    fn test_from_str_uses_start_date_format() {
        let month: Month = "08/2009".parse().unwrap();
        assert_eq!(month, Month::new(2009, 8).unwrap());
        assert!("Aug-09".parse::<Month>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Month::new(2009, 8).unwrap().to_string(), "Aug-2009");
        assert_eq!(Month::new(2010, 12).unwrap().to_string(), "Dec-2010");
    }

    #[rstest]
    #[case("\"2009-04-17\"", 2009, 4)]
    #[case("\"2009-04-01\"", 2009, 4)]
    #[case("\"2010-12-31\"", 2010, 12)]
    fn test_deserialize_truncates_to_first_of_month(
        #[case] json: &str,
        #[case] year: i32,
        #[case] month: u32,
    ) {
        let parsed: Month = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, Month::new(year, month).unwrap());
        assert_eq!(parsed.date().day(), 1);
    }

    #[test]
    fn test_serialize_as_first_of_month() {
        let json = serde_json::to_string(&Month::new(2009, 8).unwrap()).unwrap();
        assert_eq!(json, "\"2009-08-01\"");
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let a = Month::new(2009, 12).unwrap();
        let b = Month::new(2010, 1).unwrap();
        assert!(a < b);
    }
}
