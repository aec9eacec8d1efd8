use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use time::Month;

lazy_static! {
    /// Full month granularity: "2019-07" (single-digit months are accepted)
    static ref YEAR_MONTH_PATTERN: Regex = Regex::new(r"^(\d{4})-(\d{1,2})$").unwrap();

    /// Year-only granularity: "2019"
    static ref YEAR_PATTERN: Regex = Regex::new(r"^(\d{4})$").unwrap();
}

/// A calendar month, ignoring day-of-month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthError {
    input: String,
}

impl fmt::Display for ParseMonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month '{}', expected YYYY-MM", self.input)
    }
}

impl std::error::Error for ParseMonthError {}

impl YearMonth {
    pub fn new(year: i32, month: Month) -> Self {
        Self {
            year,
            month: u8::from(month),
        }
    }

    /// Build from a 1-based month number
    pub fn from_parts(year: i32, month: u8) -> Option<Self> {
        Month::try_from(month).ok().map(|m| Self::new(year, m))
    }

    /// Parse a citation creation month: "YYYY" is read as January of that
    /// year, anything else must be "YYYY-MM"
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        if raw.len() == 4 {
            let caps = YEAR_PATTERN.captures(raw)?;
            let year = caps[1].parse().ok()?;
            return Some(Self::new(year, Month::January));
        }
        raw.parse().ok()
    }
}

/// Pure calendar-month difference `a - b`
pub fn diff_month(a: &YearMonth, b: &YearMonth) -> i32 {
    (a.year - b.year) * 12 + (a.month as i32 - b.month as i32)
}

impl FromStr for YearMonth {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError {
            input: s.to_string(),
        };
        let caps = YEAR_MONTH_PATTERN.captures(s).ok_or_else(err)?;
        let year: i32 = caps[1].parse().map_err(|_| err())?;
        let month: u8 = caps[2].parse().map_err(|_| err())?;
        Self::from_parts(year, month).ok_or_else(err)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
