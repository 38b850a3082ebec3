//! Record storage for employees, attendance and payroll.
//!
//! The [`RecordStore`] trait is the single source of truth for all three
//! entities. Two backings are provided:
//!
//! - [`MemoryStore`]: process memory, lost on restart
//! - [`JsonFileStore`]: a JSON file on disk, rewritten atomically on every
//!   change
//!
//! Every mutation is all-or-nothing: a failed call leaves the store as it
//! was.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::config::{RegenerationPolicy, StoreConfig};
use crate::error::PayrollResult;
use crate::models::{
    Attendance, AttendanceFilter, AttendanceId, DeletionSummary, Employee, EmployeeId,
    NewAttendance, NewEmployee, NewPayroll, Payroll, PayrollFilter, PayrollId, PayrollStatus,
};

/// Create, read, list and delete operations for every entity.
///
/// Implementations enforce the referential invariants:
/// - no attendance or payroll record references a missing employee
/// - deleting an employee deletes its attendance and payroll records
/// - at most one attendance record per employee and date
/// - employee emails are unique, ignoring case
/// - every payroll record's net salary matches its components
pub trait RecordStore: Send {
    /// Stores a new employee and returns it with its assigned id.
    fn create_employee(&mut self, employee: NewEmployee) -> PayrollResult<Employee>;

    /// All employees, in id order.
    fn list_employees(&self) -> Vec<Employee>;

    /// Looks up one employee.
    fn get_employee(&self, id: EmployeeId) -> PayrollResult<Employee>;

    /// Deletes an employee together with its attendance and payroll.
    fn delete_employee(&mut self, id: EmployeeId) -> PayrollResult<DeletionSummary>;

    /// Stores a new attendance record.
    fn create_attendance(&mut self, attendance: NewAttendance) -> PayrollResult<Attendance>;

    /// Attendance records passing the filter, in date order.
    fn list_attendance(&self, filter: &AttendanceFilter) -> Vec<Attendance>;

    /// Looks up one attendance record.
    fn get_attendance(&self, id: AttendanceId) -> PayrollResult<Attendance>;

    /// Deletes one attendance record.
    fn delete_attendance(&mut self, id: AttendanceId) -> PayrollResult<()>;

    /// Stores a new payroll record, applying the regeneration policy to
    /// earlier records for the same employee and period.
    fn create_payroll(
        &mut self,
        payroll: NewPayroll,
        regeneration: RegenerationPolicy,
    ) -> PayrollResult<Payroll>;

    /// Payroll records passing the filter, in id order.
    fn list_payroll(&self, filter: &PayrollFilter) -> Vec<Payroll>;

    /// Looks up one payroll record.
    fn get_payroll(&self, id: PayrollId) -> PayrollResult<Payroll>;

    /// Changes the settlement status of a payroll record.
    fn update_payroll_status(
        &mut self,
        id: PayrollId,
        status: PayrollStatus,
    ) -> PayrollResult<Payroll>;

    /// Deletes one payroll record.
    fn delete_payroll(&mut self, id: PayrollId) -> PayrollResult<()>;

    /// Removes every record and restarts id sequences.
    fn clear(&mut self) -> PayrollResult<()>;
}

/// Opens the store selected by configuration.
pub fn open_store(config: &StoreConfig) -> PayrollResult<Box<dyn RecordStore>> {
    match config {
        StoreConfig::Memory => Ok(Box::new(MemoryStore::new())),
        StoreConfig::JsonFile { path } => Ok(Box::new(JsonFileStore::open(path)?)),
    }
}
