//! Listing views joining records with their employee.

use serde::{Deserialize, Serialize};

use super::{Attendance, Payroll};

/// An attendance record as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// The stored record.
    #[serde(flatten)]
    pub attendance: Attendance,
    /// Name of the employee the record belongs to.
    pub employee_name: String,
    /// Whether the arrival counts as late under the current policy.
    pub is_late: bool,
    /// Minutes after the expected start time; zero if on time or absent.
    pub late_minutes: u32,
}

/// A payroll record as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// The stored record.
    #[serde(flatten)]
    pub payroll: Payroll,
    /// Name of the employee the payroll was generated for.
    pub employee_name: String,
}
