//! Payroll model and related types.
//!
//! This module contains the persisted [`Payroll`] record, the [`NewPayroll`]
//! value built by the payroll calculator, and the [`PayrollFilter`] used to
//! list records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::{EmployeeId, Period};

/// Store-assigned identifier of a payroll record.
pub type PayrollId = u64;

/// Settlement state of a payroll record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Generated but not yet paid out.
    #[default]
    Pending,
    /// Paid out to the employee.
    Paid,
}

/// A generated payroll for one employee and one period.
///
/// Monetary fields are fixed at generation time and always satisfy
/// `net_salary = basic_salary - attendance_deduction - late_deduction
/// - additional_deductions + additional_allowances`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier for the record.
    pub id: PayrollId,
    /// The employee paid.
    pub employee_id: EmployeeId,
    /// Month of the period, 1-12.
    pub month: u32,
    /// Year of the period.
    pub year: i32,
    /// Snapshot of the employee's salary at generation time.
    pub basic_salary: Decimal,
    /// Deduction for absences and half-days.
    pub attendance_deduction: Decimal,
    /// Deduction for late arrivals.
    pub late_deduction: Decimal,
    /// Deductions entered by HR.
    pub additional_deductions: Decimal,
    /// Allowances entered by HR.
    pub additional_allowances: Decimal,
    /// The amount payable.
    pub net_salary: Decimal,
    /// Settlement state.
    pub status: PayrollStatus,
    /// Free-form note from HR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_comments: Option<String>,
    /// When the record was generated.
    pub generated_at: DateTime<Utc>,
}

impl Payroll {
    /// The period this payroll covers.
    pub fn period(&self) -> PayrollResult<Period> {
        Period::new(self.year, self.month)
    }

    /// Rejects a record whose net salary disagrees with its components.
    pub fn check_net_salary(&self) -> PayrollResult<()> {
        check_identity(
            self.net_salary,
            self.basic_salary,
            &[
                self.attendance_deduction,
                self.late_deduction,
                self.additional_deductions,
            ],
            self.additional_allowances,
        )
    }
}

/// A computed payroll before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayroll {
    /// The employee paid.
    pub employee_id: EmployeeId,
    /// The period covered.
    pub period: Period,
    /// Snapshot of the employee's salary.
    pub basic_salary: Decimal,
    /// Deduction for absences and half-days.
    pub attendance_deduction: Decimal,
    /// Deduction for late arrivals.
    pub late_deduction: Decimal,
    /// Deductions entered by HR.
    pub additional_deductions: Decimal,
    /// Allowances entered by HR.
    pub additional_allowances: Decimal,
    /// The amount payable.
    pub net_salary: Decimal,
    /// Free-form note from HR.
    pub hr_comments: Option<String>,
    /// When the record was generated.
    pub generated_at: DateTime<Utc>,
}

impl NewPayroll {
    /// Rejects a record whose net salary disagrees with its components.
    pub fn check_net_salary(&self) -> PayrollResult<()> {
        check_identity(
            self.net_salary,
            self.basic_salary,
            &[
                self.attendance_deduction,
                self.late_deduction,
                self.additional_deductions,
            ],
            self.additional_allowances,
        )
    }

    /// Attaches a store-assigned id; new records start as pending.
    pub fn into_payroll(self, id: PayrollId) -> Payroll {
        Payroll {
            id,
            employee_id: self.employee_id,
            month: self.period.month(),
            year: self.period.year(),
            basic_salary: self.basic_salary,
            attendance_deduction: self.attendance_deduction,
            late_deduction: self.late_deduction,
            additional_deductions: self.additional_deductions,
            additional_allowances: self.additional_allowances,
            net_salary: self.net_salary,
            status: PayrollStatus::Pending,
            hr_comments: self.hr_comments,
            generated_at: self.generated_at,
        }
    }
}

/// Checks `net == basic - deductions + allowances` without overflowing.
fn check_identity(
    net_salary: Decimal,
    basic_salary: Decimal,
    deductions: &[Decimal],
    allowances: Decimal,
) -> PayrollResult<()> {
    let expected = deductions
        .iter()
        .try_fold(basic_salary, |net, deduction| net.checked_sub(*deduction))
        .and_then(|net| net.checked_add(allowances))
        .ok_or_else(|| PayrollError::overflow("net_salary"))?;

    if net_salary != expected {
        return Err(PayrollError::validation(
            "net_salary",
            format!(
                "{} does not match the components, expected {}",
                net_salary, expected
            ),
        ));
    }
    Ok(())
}

/// Selects payroll records by employee, year and month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollFilter {
    /// Only records for this employee.
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    /// Only records for this year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Only records for this month.
    #[serde(default)]
    pub month: Option<u32>,
}

impl PayrollFilter {
    /// A filter for one employee's records in one period.
    pub fn for_period(employee_id: EmployeeId, period: Period) -> Self {
        Self {
            employee_id: Some(employee_id),
            year: Some(period.year()),
            month: Some(period.month()),
        }
    }

    /// Returns true if the record passes every set criterion.
    pub fn matches(&self, record: &Payroll) -> bool {
        self.employee_id.is_none_or(|id| record.employee_id == id)
            && self.year.is_none_or(|year| record.year == year)
            && self.month.is_none_or(|month| record.month == month)
    }
}
