//! Core data models for the HR payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod evaluation;
mod listing;
mod payroll;
mod period;

pub use attendance::{Attendance, AttendanceFilter, AttendanceId, AttendanceStatus, NewAttendance};
pub use employee::{Employee, EmployeeId, NewEmployee};
pub use evaluation::{AttendanceEvaluation, DeletionSummary, LateRecord, PayrollPreview};
pub use listing::{AttendanceEntry, PayrollEntry};
pub use payroll::{NewPayroll, Payroll, PayrollFilter, PayrollId, PayrollStatus};
pub use period::Period;
