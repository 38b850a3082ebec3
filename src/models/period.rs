//! Payroll period model.
//!
//! This module contains the [`Period`] type, a (year, month) pair that
//! identifies one payroll cycle.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// A calendar month identifying one payroll cycle.
///
/// Construction through [`Period::new`] guarantees the month is in 1-12 and
/// the year is representable, so the accessors never fail.
///
/// # Example
///
/// ```
/// use hr_payroll::models::Period;
/// use chrono::NaiveDate;
///
/// let period = Period::new(2024, 2).unwrap();
/// assert_eq!(period.days_in_month(), 29);
/// assert!(period.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period, rejecting months outside 1-12.
    pub fn new(year: i32, month: u32) -> PayrollResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(PayrollError::InvalidPeriod {
                message: format!("month {} is outside 1-12", month),
            });
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(PayrollError::InvalidPeriod {
                message: format!("year {} is not a representable calendar year", year),
            });
        }
        Ok(Self { year, month })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The number of days in the month, accounting for leap years.
    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    /// Returns the date of `day` within this month.
    ///
    /// Days outside `[1, days_in_month]` are rejected with
    /// [`PayrollError::InvalidPeriod`].
    pub fn date(&self, day: u32) -> PayrollResult<NaiveDate> {
        if day == 0 || day > self.days_in_month() {
            return Err(PayrollError::InvalidPeriod {
                message: format!(
                    "day {} is outside 1-{} for {}",
                    day,
                    self.days_in_month(),
                    self
                ),
            });
        }
        NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
            PayrollError::InvalidPeriod {
                message: format!("{}-{:02}-{:02} is not a valid date", self.year, self.month, day),
            }
        })
    }

    /// Checks if a date falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
