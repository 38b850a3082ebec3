//! Net salary calculation.
//!
//! This module combines an employee's basic salary, the attendance
//! evaluation for a period and HR-entered adjustments into a payroll
//! record ready to persist.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{AttendanceEvaluation, Employee, NewPayroll, Period};

/// Deductions and allowances entered by HR for one payroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollAdjustments {
    additional_deductions: Decimal,
    additional_allowances: Decimal,
}

impl PayrollAdjustments {
    /// Creates adjustments, rejecting negative amounts and amounts above
    /// `max_amount`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_payroll::calculation::PayrollAdjustments;
    /// use rust_decimal::Decimal;
    ///
    /// let max = Decimal::new(1_000_000, 0);
    /// assert!(PayrollAdjustments::new(Decimal::ZERO, Decimal::new(1000, 0), max).is_ok());
    /// assert!(PayrollAdjustments::new(Decimal::new(-1, 0), Decimal::ZERO, max).is_err());
    /// assert!(PayrollAdjustments::new(Decimal::ZERO, Decimal::MAX, max).is_err());
    /// ```
    pub fn new(
        additional_deductions: Decimal,
        additional_allowances: Decimal,
        max_amount: Decimal,
    ) -> PayrollResult<Self> {
        for (field, value) in [
            ("additional_deductions", additional_deductions),
            ("additional_allowances", additional_allowances),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(PayrollError::InvalidArgument {
                    field: field.to_string(),
                    message: format!("must not be negative, got {}", value),
                });
            }
            if value > max_amount {
                return Err(PayrollError::InvalidArgument {
                    field: field.to_string(),
                    message: format!("must not exceed {}, got {}", max_amount, value),
                });
            }
        }

        Ok(Self {
            additional_deductions,
            additional_allowances,
        })
    }

    /// Deductions entered by HR.
    pub fn additional_deductions(&self) -> Decimal {
        self.additional_deductions
    }

    /// Allowances entered by HR.
    pub fn additional_allowances(&self) -> Decimal {
        self.additional_allowances
    }
}

/// Computes `basic - attendance - late - additional deductions +
/// allowances`.
///
/// The arithmetic is exact; every input is already in minor units.
///
/// # Errors
///
/// Returns [`PayrollError::InvalidArgument`] if the result leaves the
/// decimal range.
pub fn calculate_net_salary(
    basic_salary: Decimal,
    evaluation: &AttendanceEvaluation,
    adjustments: &PayrollAdjustments,
) -> PayrollResult<Decimal> {
    basic_salary
        .checked_sub(evaluation.attendance_deduction)
        .and_then(|net| net.checked_sub(evaluation.late_deduction))
        .and_then(|net| net.checked_sub(adjustments.additional_deductions))
        .and_then(|net| net.checked_add(adjustments.additional_allowances))
        .ok_or_else(|| PayrollError::overflow("net_salary"))
}

/// Builds the payroll record for an employee and period.
///
/// The employee's current salary is snapshotted as the basic salary.
/// Blank comments are dropped.
pub fn build_payroll(
    employee: &Employee,
    period: Period,
    evaluation: &AttendanceEvaluation,
    adjustments: &PayrollAdjustments,
    hr_comments: Option<String>,
    generated_at: DateTime<Utc>,
) -> PayrollResult<NewPayroll> {
    let hr_comments = hr_comments
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(NewPayroll {
        employee_id: employee.id,
        period,
        basic_salary: employee.salary,
        attendance_deduction: evaluation.attendance_deduction,
        late_deduction: evaluation.late_deduction,
        additional_deductions: adjustments.additional_deductions,
        additional_allowances: adjustments.additional_allowances,
        net_salary: calculate_net_salary(employee.salary, evaluation, adjustments)?,
        hr_comments,
        generated_at,
    })
}
