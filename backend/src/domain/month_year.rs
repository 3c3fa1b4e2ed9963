//! Month-and-year granularity date.
//!
//! Subscriptions are billed per calendar month, so their validity window is
//! tracked as a [`MonthYear`] rather than a full date. The value always points
//! at the first day of its month.
//!
//! Wire form is `MM-YYYY` (`"07-2025"`); storage form is a `DATE` on the first
//! of the month (`2025-07-01`).

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static MONTH_YEAR_RE: OnceLock<Regex> = OnceLock::new();

fn month_year_regex() -> &'static Regex {
    MONTH_YEAR_RE.get_or_init(|| {
        // ASCII digits only; `\d` would accept other Unicode digits.
        Regex::new("^([0-9]{2})-([0-9]{4})$")
            .unwrap_or_else(|error| panic!("month-year regex failed to compile: {error}"))
    })
}

/// Errors raised when decoding a month-year from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthYearFormatError {
    /// Input is not exactly two digits, a dash and four digits.
    #[error("invalid month-year `{value}`: expected MM-YYYY")]
    InvalidPattern { value: String },
    /// Month component is outside `01..=12`.
    #[error("invalid month-year `{value}`: month must be between 01 and 12")]
    MonthOutOfRange { value: String },
}

/// Calendar month of a given year, normalised to the first day.
///
/// Ordering follows the calendar.
///
/// # Examples
/// ```
/// use subscriptions_aggregator::domain::MonthYear;
///
/// let month: MonthYear = "07-2025".parse().expect("valid month-year");
/// assert_eq!(month.to_string(), "07-2025");
/// assert_eq!(month.to_storage_string(), "2025-07-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    /// Build a month-year from its components.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthYearFormatError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| MonthYearFormatError::MonthOutOfRange {
                value: format!("{month:02}-{year:04}"),
            })
    }

    /// Collapse a calendar date onto its month. The day is discarded.
    pub fn from_date(date: NaiveDate) -> Self {
        // Every month has a first day.
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Collapse a UTC timestamp onto its month. Day and time are discarded.
    pub fn from_datetime(timestamp: DateTime<Utc>) -> Self {
        Self::from_date(timestamp.date_naive())
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Calendar month, `1..=12`.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Midnight UTC on the first day of the month.
    pub fn start_of_month_utc(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// Storage representation, `YYYY-MM-01`.
    pub fn to_storage_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl FromStr for MonthYear {
    type Err = MonthYearFormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || MonthYearFormatError::InvalidPattern {
            value: value.to_owned(),
        };
        let captures = month_year_regex().captures(value).ok_or_else(invalid)?;
        let month: u32 = captures[1].parse().map_err(|_| invalid())?;
        let year: i32 = captures[2].parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| MonthYearFormatError::MonthOutOfRange {
                value: value.to_owned(),
            })
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl TryFrom<String> for MonthYear {
    type Error = MonthYearFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthYear> for String {
    fn from(value: MonthYear) -> Self {
        value.to_string()
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(value: NaiveDate) -> Self {
        Self::from_date(value)
    }
}
