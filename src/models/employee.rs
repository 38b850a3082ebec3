//! Employee model and related types.
//!
//! This module defines the stored [`Employee`] record and the
//! [`NewEmployee`] value the record store accepts when creating one.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// Store-assigned identifier of an employee.
pub type EmployeeId = u64;

/// Represents an employee whose attendance and payroll are tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: EmployeeId,
    /// Full name.
    pub name: String,
    /// Contact email, unique across employees.
    pub email: String,
    /// Job title or position.
    pub position: String,
    /// Monthly base salary in the base currency.
    pub salary: Decimal,
    /// The date the employee joined.
    pub join_date: NaiveDate,
}

/// The fields of an employee before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Job title or position.
    pub position: String,
    /// Monthly base salary in the base currency.
    pub salary: Decimal,
    /// The date the employee joined.
    pub join_date: NaiveDate,
}

impl NewEmployee {
    /// Checks the required fields and that the salary lies in
    /// `(0, max_salary]`.
    ///
    /// Text fields are trimmed before they are checked, and the trimmed
    /// values are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_payroll::models::NewEmployee;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = NewEmployee {
    ///     name: "  Asha Rao ".to_string(),
    ///     email: "asha@company.name".to_string(),
    ///     position: "Accountant".to_string(),
    ///     salary: Decimal::new(50000, 0),
    ///     join_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
    /// }
    /// .validated(Decimal::new(1_000_000, 0))
    /// .unwrap();
    /// assert_eq!(employee.name, "Asha Rao");
    /// ```
    pub fn validated(mut self, max_salary: Decimal) -> PayrollResult<Self> {
        self.name = required("name", &self.name)?;
        self.email = required("email", &self.email)?;
        self.position = required("position", &self.position)?;

        let (local, domain) = self.email.split_once('@').unwrap_or(("", ""));
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(PayrollError::validation(
                "email",
                format!("'{}' is not a valid email address", self.email),
            ));
        }

        if self.salary <= Decimal::ZERO {
            return Err(PayrollError::validation(
                "salary",
                format!("must be greater than zero, got {}", self.salary),
            ));
        }
        if self.salary > max_salary {
            return Err(PayrollError::validation(
                "salary",
                format!("must not exceed {}, got {}", max_salary, self.salary),
            ));
        }

        Ok(self)
    }

    /// Attaches a store-assigned id.
    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            name: self.name,
            email: self.email,
            position: self.position,
            salary: self.salary,
            join_date: self.join_date,
        }
    }
}

fn required(field: &str, value: &str) -> PayrollResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PayrollError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}
