//! Result models produced by the attendance evaluator and the payroll
//! preview.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, Period};

/// A day on which the employee arrived past the lateness threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateRecord {
    /// The day of the late arrival.
    pub date: NaiveDate,
    /// Minutes after the expected start time.
    pub late_minutes: u32,
}

/// Attendance-derived deductions for one employee and one period.
///
/// # Example
///
/// ```
/// use hr_payroll::models::AttendanceEvaluation;
/// use rust_decimal::Decimal;
///
/// let evaluation = AttendanceEvaluation::empty(Decimal::new(166667, 2));
/// assert_eq!(evaluation.attendance_deduction, Decimal::ZERO);
/// assert!(evaluation.late_records.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvaluation {
    /// Basic salary divided by the days in the month.
    pub daily_rate: Decimal,
    /// Deduction for absences and half-days.
    pub attendance_deduction: Decimal,
    /// Deduction for late minutes.
    pub late_deduction: Decimal,
    /// Number of absences in the period.
    pub absent_days: u32,
    /// Number of half-days in the period.
    pub half_days: u32,
    /// Every late arrival in the period, in date order.
    pub late_records: Vec<LateRecord>,
}

impl AttendanceEvaluation {
    /// An evaluation with no deductions.
    pub fn empty(daily_rate: Decimal) -> Self {
        Self {
            daily_rate,
            attendance_deduction: Decimal::ZERO,
            late_deduction: Decimal::ZERO,
            absent_days: 0,
            half_days: 0,
            late_records: Vec::new(),
        }
    }

    /// Total late minutes across the period.
    pub fn total_late_minutes(&self) -> u32 {
        self.late_records
            .iter()
            .fold(0u32, |total, r| total.saturating_add(r.late_minutes))
    }
}

/// The figures a payroll would be generated from, without persisting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPreview {
    /// The employee previewed.
    pub employee_id: EmployeeId,
    /// Year of the period.
    pub year: i32,
    /// Month of the period.
    pub month: u32,
    /// The employee's current salary.
    pub basic_salary: Decimal,
    /// Deduction for absences and half-days.
    pub attendance_deduction: Decimal,
    /// Deduction for late minutes.
    pub late_deduction: Decimal,
    /// Number of absences in the period.
    pub absent_days: u32,
    /// Number of half-days in the period.
    pub half_days: u32,
    /// Every late arrival in the period.
    pub late_records: Vec<LateRecord>,
}

impl PayrollPreview {
    /// Combines the salary snapshot with an evaluation.
    pub fn new(
        employee_id: EmployeeId,
        period: Period,
        basic_salary: Decimal,
        evaluation: AttendanceEvaluation,
    ) -> Self {
        Self {
            employee_id,
            year: period.year(),
            month: period.month(),
            basic_salary,
            attendance_deduction: evaluation.attendance_deduction,
            late_deduction: evaluation.late_deduction,
            absent_days: evaluation.absent_days,
            half_days: evaluation.half_days,
            late_records: evaluation.late_records,
        }
    }
}

/// What a cascading employee deletion removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionSummary {
    /// The deleted employee.
    pub employee_id: EmployeeId,
    /// Attendance records removed with the employee.
    pub attendance_removed: usize,
    /// Payroll records removed with the employee.
    pub payroll_removed: usize,
}
