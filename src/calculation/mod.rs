//! Calculation logic for the HR payroll engine.
//!
//! This module contains the attendance evaluator (absence, half-day and
//! lateness deductions), the net salary calculator, and currency rounding
//! and conversion.

mod attendance;
mod currency;
mod lateness;
mod net_salary;

pub use attendance::evaluate_attendance;
pub use currency::{convert_to_base, round_currency};
pub use lateness::{late_minutes, lateness};
pub use net_salary::{PayrollAdjustments, build_payroll, calculate_net_salary};
