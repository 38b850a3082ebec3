//! Request types for the HR payroll API.
//!
//! These mirror the JSON bodies and query strings the endpoints accept and
//! convert into the service's input types.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::Credentials;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AttendanceFilter, AttendanceStatus, EmployeeId, NewAttendance, PayrollFilter, PayrollStatus,
    Period,
};
use crate::service::{EmployeeInput, PayrollInput};

/// Request body for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(req: LoginRequest) -> Self {
        Credentials {
            username: req.username,
            password: req.password,
        }
    }
}

/// Request body for `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Job title or position.
    pub position: String,
    /// Monthly salary.
    pub salary: Decimal,
    /// Currency code of `salary`, e.g. "USD"; the base currency if absent.
    #[serde(default)]
    pub salary_currency: Option<String>,
    /// Joining date; today if absent.
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
}

impl From<EmployeeRequest> for EmployeeInput {
    fn from(req: EmployeeRequest) -> Self {
        EmployeeInput {
            name: req.name,
            email: req.email,
            position: req.position,
            salary: req.salary,
            salary_currency: req.salary_currency,
            join_date: req.join_date,
        }
    }
}

/// Request body for `POST /attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// The employee attending.
    pub employee_id: EmployeeId,
    /// The day attended.
    pub date: NaiveDate,
    /// `present`, `absent`, `half_day` or `late`.
    pub status: AttendanceStatus,
    /// Arrival time such as "09:20:00"; omitted for absences.
    #[serde(default)]
    pub arrival_time: Option<NaiveTime>,
}

impl From<AttendanceRequest> for NewAttendance {
    fn from(req: AttendanceRequest) -> Self {
        NewAttendance {
            employee_id: req.employee_id,
            date: req.date,
            status: req.status,
            arrival_time: req.arrival_time,
        }
    }
}

/// Request body for `POST /payroll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The employee to pay.
    pub employee_id: EmployeeId,
    /// Payroll year.
    pub year: i32,
    /// Payroll month, 1-12.
    pub month: u32,
    /// Extra deductions; zero if absent.
    #[serde(default)]
    pub additional_deductions: Decimal,
    /// Extra allowances; zero if absent.
    #[serde(default)]
    pub additional_allowances: Decimal,
    /// Free-text note.
    #[serde(default)]
    pub hr_comments: Option<String>,
}

impl From<PayrollRequest> for PayrollInput {
    fn from(req: PayrollRequest) -> Self {
        PayrollInput {
            employee_id: req.employee_id,
            year: req.year,
            month: req.month,
            additional_deductions: req.additional_deductions,
            additional_allowances: req.additional_allowances,
            hr_comments: req.hr_comments,
        }
    }
}

/// Request body for `PUT /payroll/:id/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    /// The new status.
    pub status: PayrollStatus,
}

/// Query string for the attendance and payroll listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListQuery {
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

impl ListQuery {
    /// The attendance filter for this query.
    ///
    /// Attendance is filtered by whole periods, so `year` and `month` must
    /// be given together.
    pub fn attendance_filter(&self) -> PayrollResult<AttendanceFilter> {
        let period = match (self.year, self.month) {
            (Some(year), Some(month)) => Some(Period::new(year, month)?),
            (None, None) => None,
            _ => {
                return Err(PayrollError::validation(
                    "month",
                    "year and month must be given together",
                ));
            }
        };

        Ok(AttendanceFilter {
            employee_id: self.employee_id,
            period,
        })
    }

    /// The payroll filter for this query.
    pub fn payroll_filter(&self) -> PayrollFilter {
        PayrollFilter {
            employee_id: self.employee_id,
            year: self.year,
            month: self.month,
        }
    }
}
