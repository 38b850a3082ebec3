//! The payroll service.
//!
//! [`PayrollService`] is the one entry point the HTTP layer and the binary
//! use. It owns the record store behind a mutex and applies the configured
//! policy: every operation runs to completion under the lock, so payroll
//! generation reads the employee and attendance and writes the payroll
//! without interleaving with other changes.

use std::sync::Mutex;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::{
    PayrollAdjustments, build_payroll, convert_to_base, evaluate_attendance, late_minutes,
};
use crate::config::PolicyConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Attendance, AttendanceEntry, AttendanceEvaluation, AttendanceFilter, AttendanceId,
    DeletionSummary, Employee, EmployeeId, NewAttendance, NewEmployee, Payroll, PayrollEntry,
    PayrollFilter, PayrollId, PayrollPreview, PayrollStatus, Period,
};
use crate::store::{MemoryStore, RecordStore};

/// Input for creating an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeInput {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Job title or position.
    pub position: String,
    /// Monthly salary in `salary_currency`.
    pub salary: Decimal,
    /// Currency of `salary`; the base currency when absent.
    #[serde(default)]
    pub salary_currency: Option<String>,
    /// Joining date; today when absent.
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
}

/// Input for generating a payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// The employee to pay.
    pub employee_id: EmployeeId,
    /// Payroll year.
    pub year: i32,
    /// Payroll month, 1-12.
    pub month: u32,
    /// Extra deductions entered by HR.
    #[serde(default)]
    pub additional_deductions: Decimal,
    /// Extra allowances entered by HR.
    #[serde(default)]
    pub additional_allowances: Decimal,
    /// Free-text note.
    #[serde(default)]
    pub hr_comments: Option<String>,
}

/// Every table of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// All employees.
    pub employees: Vec<Employee>,
    /// All attendance records.
    pub attendance: Vec<Attendance>,
    /// All payroll records.
    pub payroll: Vec<Payroll>,
}

/// Employee, attendance and payroll operations over a shared record store.
pub struct PayrollService {
    store: Mutex<Box<dyn RecordStore>>,
    policy: PolicyConfig,
}

impl std::fmt::Debug for PayrollService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayrollService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PayrollService {
    /// Creates a service over an opened store.
    pub fn new(store: Box<dyn RecordStore>, policy: PolicyConfig) -> Self {
        Self {
            store: Mutex::new(store),
            policy,
        }
    }

    /// Creates a service over an empty in-memory store.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_payroll::config::PolicyConfig;
    /// use hr_payroll::service::PayrollService;
    ///
    /// let service = PayrollService::in_memory(PolicyConfig::default());
    /// assert!(service.list_employees().unwrap().is_empty());
    /// ```
    pub fn in_memory(policy: PolicyConfig) -> Self {
        Self::new(Box::new(MemoryStore::new()), policy)
    }

    /// The policy this service applies.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    fn with_store<T>(
        &self,
        operation: impl FnOnce(&mut dyn RecordStore) -> PayrollResult<T>,
    ) -> PayrollResult<T> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| PayrollError::storage("record store lock poisoned"))?;
        operation(store.as_mut())
    }

    /// All employees, in id order.
    pub fn list_employees(&self) -> PayrollResult<Vec<Employee>> {
        self.with_store(|store| Ok(store.list_employees()))
    }

    /// Looks up one employee.
    pub fn get_employee(&self, id: EmployeeId) -> PayrollResult<Employee> {
        self.with_store(|store| store.get_employee(id))
    }

    /// Creates an employee.
    ///
    /// A salary in a foreign currency is converted to the base currency
    /// with the configured exchange rate.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::Validation`] for a missing field, a bad email, a
    ///   salary outside `(0, currency.max_amount]` or an unknown currency
    /// - [`PayrollError::Conflict`] if the email is already used
    pub fn create_employee(&self, input: EmployeeInput) -> PayrollResult<Employee> {
        let salary = convert_to_base(
            input.salary,
            input.salary_currency.as_deref(),
            &self.policy.currency,
        )?;

        let new_employee = NewEmployee {
            name: input.name,
            email: input.email,
            position: input.position,
            salary,
            join_date: input.join_date.unwrap_or_else(|| Utc::now().date_naive()),
        }
        .validated(self.policy.currency.max_amount)?;

        let employee = self.with_store(|store| store.create_employee(new_employee))?;
        info!(
            employee_id = employee.id,
            salary = %employee.salary,
            "Employee created"
        );
        Ok(employee)
    }

    /// Deletes an employee with all of its attendance and payroll.
    pub fn delete_employee(&self, id: EmployeeId) -> PayrollResult<DeletionSummary> {
        let summary = self.with_store(|store| store.delete_employee(id))?;
        info!(
            employee_id = id,
            attendance_removed = summary.attendance_removed,
            payroll_removed = summary.payroll_removed,
            "Employee deleted"
        );
        Ok(summary)
    }

    /// Records one day of attendance.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::Validation`] if the arrival time disagrees with
    ///   the status, or the date is in the future and future dates are not
    ///   allowed
    /// - [`PayrollError::InvalidPeriod`] if the date's year is outside the
    ///   payroll year range
    /// - [`PayrollError::ReferentialIntegrity`] if the employee is missing
    /// - [`PayrollError::Conflict`] if the day is already recorded
    pub fn record_attendance(&self, attendance: NewAttendance) -> PayrollResult<Attendance> {
        let attendance = attendance.validated()?;

        let today = Utc::now().date_naive();
        if attendance.date > today && !self.policy.attendance.allow_future_dates {
            return Err(PayrollError::validation(
                "date",
                format!("{} is in the future", attendance.date),
            ));
        }
        self.policy
            .payroll
            .period(attendance.date.year(), attendance.date.month())?;

        let record = self.with_store(|store| store.create_attendance(attendance))?;
        info!(
            attendance_id = record.id,
            employee_id = record.employee_id,
            date = %record.date,
            "Attendance recorded"
        );
        Ok(record)
    }

    /// Attendance records passing the filter, in date order.
    pub fn list_attendance(&self, filter: &AttendanceFilter) -> PayrollResult<Vec<Attendance>> {
        self.with_store(|store| Ok(store.list_attendance(filter)))
    }

    /// Attendance records with employee names and lateness.
    pub fn attendance_entries(
        &self,
        filter: &AttendanceFilter,
    ) -> PayrollResult<Vec<AttendanceEntry>> {
        let policy = &self.policy.attendance;

        self.with_store(|store| {
            store
                .list_attendance(filter)
                .into_iter()
                .map(|attendance| -> PayrollResult<AttendanceEntry> {
                    let employee = store.get_employee(attendance.employee_id)?;
                    let minutes = match attendance.arrival_time {
                        Some(arrival) if attendance.status.counts_lateness() => {
                            late_minutes(arrival, policy)
                        }
                        _ => 0,
                    };
                    Ok(AttendanceEntry {
                        attendance,
                        employee_name: employee.name,
                        is_late: policy.is_late(minutes),
                        late_minutes: minutes,
                    })
                })
                .collect()
        })
    }

    /// Looks up one attendance record.
    pub fn get_attendance(&self, id: AttendanceId) -> PayrollResult<Attendance> {
        self.with_store(|store| store.get_attendance(id))
    }

    /// Deletes one attendance record.
    pub fn delete_attendance(&self, id: AttendanceId) -> PayrollResult<()> {
        self.with_store(|store| store.delete_attendance(id))?;
        info!(attendance_id = id, "Attendance deleted");
        Ok(())
    }

    /// Evaluates an employee's attendance for a period.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::InvalidPeriod`] for a bad month or year
    /// - [`PayrollError::NotFound`] if the employee is missing
    pub fn evaluate_attendance(
        &self,
        employee_id: EmployeeId,
        year: i32,
        month: u32,
    ) -> PayrollResult<AttendanceEvaluation> {
        let period = self.policy.payroll.period(year, month)?;
        self.with_store(|store| {
            let employee = store.get_employee(employee_id)?;
            self.evaluate(store, &employee, period)
        })
    }

    /// Computes what a payroll would contain without storing it.
    pub fn calculate_payroll_preview(
        &self,
        employee_id: EmployeeId,
        year: i32,
        month: u32,
    ) -> PayrollResult<PayrollPreview> {
        let period = self.policy.payroll.period(year, month)?;
        self.with_store(|store| {
            let employee = store.get_employee(employee_id)?;
            let evaluation = self.evaluate(store, &employee, period)?;
            Ok(PayrollPreview::new(
                employee.id,
                period,
                employee.salary,
                evaluation,
            ))
        })
    }

    /// Generates and stores a payroll.
    ///
    /// The employee's current salary becomes the basic salary. Earlier
    /// payrolls for the same period are kept or replaced according to the
    /// regeneration policy.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::InvalidArgument`] for negative adjustments,
    ///   adjustments above `currency.max_amount` or a net salary that
    ///   leaves the decimal range
    /// - [`PayrollError::InvalidPeriod`] for a bad month or year
    /// - [`PayrollError::NotFound`] if the employee is missing
    ///
    /// Nothing is stored when an error is returned.
    pub fn generate_payroll(&self, input: PayrollInput) -> PayrollResult<Payroll> {
        let adjustments = PayrollAdjustments::new(
            input.additional_deductions,
            input.additional_allowances,
            self.policy.currency.max_amount,
        )?;
        let period = self.policy.payroll.period(input.year, input.month)?;
        let regeneration = self.policy.payroll.regeneration;

        let payroll = self.with_store(|store| {
            let employee = store.get_employee(input.employee_id)?;
            let evaluation = self.evaluate(store, &employee, period)?;
            let new_payroll = build_payroll(
                &employee,
                period,
                &evaluation,
                &adjustments,
                input.hr_comments,
                Utc::now(),
            )?;
            store.create_payroll(new_payroll, regeneration)
        })?;

        info!(
            payroll_id = payroll.id,
            employee_id = payroll.employee_id,
            period = %period,
            net_salary = %payroll.net_salary,
            "Payroll generated"
        );
        Ok(payroll)
    }

    /// Payroll records passing the filter, in id order.
    pub fn list_payroll(&self, filter: &PayrollFilter) -> PayrollResult<Vec<Payroll>> {
        self.with_store(|store| Ok(store.list_payroll(filter)))
    }

    /// Payroll records with employee names.
    pub fn payroll_entries(&self, filter: &PayrollFilter) -> PayrollResult<Vec<PayrollEntry>> {
        self.with_store(|store| {
            store
                .list_payroll(filter)
                .into_iter()
                .map(|payroll| -> PayrollResult<PayrollEntry> {
                    let employee = store.get_employee(payroll.employee_id)?;
                    Ok(PayrollEntry {
                        payroll,
                        employee_name: employee.name,
                    })
                })
                .collect()
        })
    }

    /// Looks up one payroll record.
    pub fn get_payroll(&self, id: PayrollId) -> PayrollResult<Payroll> {
        self.with_store(|store| store.get_payroll(id))
    }

    /// Marks a payroll as pending or paid.
    pub fn update_payroll_status(
        &self,
        id: PayrollId,
        status: PayrollStatus,
    ) -> PayrollResult<Payroll> {
        let payroll = self.with_store(|store| store.update_payroll_status(id, status))?;
        info!(payroll_id = id, status = ?status, "Payroll status updated");
        Ok(payroll)
    }

    /// Deletes one payroll record.
    pub fn delete_payroll(&self, id: PayrollId) -> PayrollResult<()> {
        self.with_store(|store| store.delete_payroll(id))?;
        info!(payroll_id = id, "Payroll deleted");
        Ok(())
    }

    /// Removes every record and restarts id sequences.
    pub fn clear_all_data(&self) -> PayrollResult<()> {
        self.with_store(|store| store.clear())?;
        info!("All records cleared");
        Ok(())
    }

    /// Copies every table.
    pub fn snapshot(&self) -> PayrollResult<StoreSnapshot> {
        self.with_store(|store| {
            Ok(StoreSnapshot {
                employees: store.list_employees(),
                attendance: store.list_attendance(&AttendanceFilter::default()),
                payroll: store.list_payroll(&PayrollFilter::default()),
            })
        })
    }

    fn evaluate(
        &self,
        store: &dyn RecordStore,
        employee: &Employee,
        period: Period,
    ) -> PayrollResult<AttendanceEvaluation> {
        let records = store.list_attendance(&AttendanceFilter::for_period(employee.id, period));
        evaluate_attendance(
            &records,
            period,
            employee.salary,
            &self.policy.attendance,
            self.policy.currency.decimal_places,
        )
    }
}
