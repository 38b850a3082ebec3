//! Attendance model and related types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::{EmployeeId, Period};

/// Store-assigned identifier of an attendance record.
pub type AttendanceId = u64;

/// How an employee attended on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked the full day.
    Present,
    /// Did not attend.
    Absent,
    /// Worked half of the day.
    HalfDay,
    /// Marked late by HR; the arrival time decides the penalty.
    Late,
}

impl AttendanceStatus {
    /// Returns true if the status implies the employee arrived, and so
    /// requires an arrival time.
    pub fn requires_arrival(&self) -> bool {
        !matches!(self, AttendanceStatus::Absent)
    }

    /// Returns true if lateness is assessed for this status.
    pub fn counts_lateness(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

/// A single day of attendance for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// Unique identifier for the record.
    pub id: AttendanceId,
    /// The employee this record belongs to.
    pub employee_id: EmployeeId,
    /// The day attended.
    pub date: NaiveDate,
    /// How the employee attended.
    pub status: AttendanceStatus,
    /// Arrival time; absent exactly when `status` is `Absent`.
    #[serde(default)]
    pub arrival_time: Option<NaiveTime>,
}

/// The fields of an attendance record before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttendance {
    /// The employee this record belongs to.
    pub employee_id: EmployeeId,
    /// The day attended.
    pub date: NaiveDate,
    /// How the employee attended.
    pub status: AttendanceStatus,
    /// Arrival time, required unless `status` is `Absent`.
    #[serde(default)]
    pub arrival_time: Option<NaiveTime>,
}

impl NewAttendance {
    /// Checks that the arrival time agrees with the status.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_payroll::models::{AttendanceStatus, NewAttendance};
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let absent_with_time = NewAttendance {
    ///     employee_id: 1,
    ///     date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    ///     status: AttendanceStatus::Absent,
    ///     arrival_time: NaiveTime::from_hms_opt(9, 0, 0),
    /// };
    /// assert!(absent_with_time.validated().is_err());
    /// ```
    pub fn validated(self) -> PayrollResult<Self> {
        match (self.status.requires_arrival(), self.arrival_time) {
            (true, None) => Err(PayrollError::validation(
                "arrival_time",
                "is required unless the status is absent",
            )),
            (false, Some(_)) => Err(PayrollError::validation(
                "arrival_time",
                "must be empty when the status is absent",
            )),
            _ => Ok(self),
        }
    }

    /// Attaches a store-assigned id.
    pub fn into_attendance(self, id: AttendanceId) -> Attendance {
        Attendance {
            id,
            employee_id: self.employee_id,
            date: self.date,
            status: self.status,
            arrival_time: self.arrival_time,
        }
    }
}

/// Selects attendance records by employee and/or period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    /// Only records for this employee.
    pub employee_id: Option<EmployeeId>,
    /// Only records dated within this month.
    pub period: Option<Period>,
}

impl AttendanceFilter {
    /// A filter for one employee's records in one period.
    pub fn for_period(employee_id: EmployeeId, period: Period) -> Self {
        Self {
            employee_id: Some(employee_id),
            period: Some(period),
        }
    }

    /// Returns true if the record passes every set criterion.
    pub fn matches(&self, record: &Attendance) -> bool {
        self.employee_id.is_none_or(|id| record.employee_id == id)
            && self.period.is_none_or(|period| period.contains(record.date))
    }
}
