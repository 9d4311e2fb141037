//! Payroll period and date range models.
//!
//! This module contains the [`Period`] type (one calendar month, written
//! `YYYY-MM`) and the inclusive [`DateRange`] used for every store query.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An inclusive range of calendar dates.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange {
///     start: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
///     end: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
/// };
///
/// assert!(range.contains(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
/// assert!(range.contains(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
/// assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
/// assert_eq!(range.working_days(), 24);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range (inclusive).
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Checks if a given date falls within the range, inclusive of both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates every date in the range in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// Counts the days in the range that are not Sundays.
    pub fn working_days(&self) -> u32 {
        self.days().filter(|d| d.weekday() != Weekday::Sun).count() as u32
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Option<Self> {
        Period::new(date.year(), date.month())
            .ok()
            .map(|p| p.date_range())
    }

    /// The calendar year containing `date`.
    pub fn year_of(date: NaiveDate) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(date.year(), 1, 1)?,
            end: NaiveDate::from_ymd_opt(date.year(), 12, 31)?,
        })
    }
}

/// One calendar month that recaps and payrolls are computed for.
///
/// Periods are parsed from and serialized as `YYYY-MM` strings.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Period;
/// use chrono::NaiveDate;
///
/// let period: Period = "2026-02".parse().unwrap();
/// assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
/// assert_eq!(period.last_day(), NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
/// assert_eq!(period.to_string(), "2026-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl Period {
    /// Creates the period for the given year and month (1-12).
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidPeriod {
            value: format!("{:04}-{:02}", year, month),
        };

        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// The period containing `date`.
    pub fn containing(date: NaiveDate) -> EngineResult<Self> {
        Self::new(date.year(), date.month())
    }

    /// Calendar year of the period.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Calendar month of the period (1-12).
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// The inclusive date range covering the whole month.
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.first_day,
            end: self.last_day,
        }
    }

    /// Checks if a given date falls within the month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_range().contains(date)
    }

    /// Days in the month excluding Sundays.
    pub fn working_days(&self) -> u32 {
        self.date_range().working_days()
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPeriod {
            value: s.to_string(),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl TryFrom<String> for Period {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}
