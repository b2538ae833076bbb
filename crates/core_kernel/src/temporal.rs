//! Reporting periods and filing-deadline date arithmetic
//!
//! Business dates are calendar dates (`NaiveDate`). The only place wall-clock
//! time enters is [`Timezone::today`], used by callers that need a
//! generation date in the UAE's local time.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper for company jurisdictions
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Gulf Standard Time, the UAE's only zone
    pub fn uae() -> Self {
        Self(chrono_tz::Asia::Dubai)
    }

    /// Converts a UTC instant to the local calendar date
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.0).date_naive()
    }

    /// Today's calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::uae()
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

/// An inclusive calendar-date window, e.g. a VAT quarter or a financial year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingPeriod {
    #[serde(rename = "startDate")]
    pub start: NaiveDate,
    #[serde(rename = "endDate")]
    pub end: NaiveDate,
}

impl ReportingPeriod {
    /// Creates a period; `start` may equal `end` (a one-day period)
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// The calendar year containing `year`'s dates
    pub fn calendar_year(year: i32) -> Result<Self, TemporalError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| TemporalError::OutOfRange(format!("year {}", year)))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| TemporalError::OutOfRange(format!("year {}", year)))?;
        Ok(Self { start, end })
    }

    /// The twelve months ending on `as_of` (inclusive)
    pub fn trailing_twelve_months(as_of: NaiveDate) -> Result<Self, TemporalError> {
        let start = as_of
            .checked_sub_months(Months::new(12))
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .ok_or_else(|| TemporalError::OutOfRange(as_of.to_string()))?;
        Ok(Self { start, end: as_of })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days in the period, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The last day before the period opens
    pub fn day_before_start(&self) -> Option<NaiveDate> {
        self.start.pred_opt()
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// First day of the calendar financial year containing `date`
pub fn financial_year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Due date a fixed number of days after a period end
pub fn deadline_after_days(period_end: NaiveDate, offset_days: u32) -> Result<NaiveDate, TemporalError> {
    period_end
        .checked_add_days(Days::new(u64::from(offset_days)))
        .ok_or_else(|| TemporalError::OutOfRange(format!("{} + {} days", period_end, offset_days)))
}

/// Due date a number of calendar months after a period end, clamped to month end
pub fn deadline_after_months(period_end: NaiveDate, offset_months: u32) -> Result<NaiveDate, TemporalError> {
    period_end
        .checked_add_months(Months::new(offset_months))
        .ok_or_else(|| TemporalError::OutOfRange(format!("{} + {} months", period_end, offset_months)))
}
