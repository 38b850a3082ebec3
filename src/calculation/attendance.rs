//! Attendance evaluation.
//!
//! This module turns an employee's attendance records for one month into
//! the absence and lateness deductions applied to their payroll.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::AttendancePolicy;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{Attendance, AttendanceEvaluation, AttendanceStatus, LateRecord, Period};

use super::currency::round_currency;
use super::lateness::lateness;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Computes attendance-derived deductions for one period.
///
/// # Rules
///
/// - The daily rate is `basic_salary / days_in_month`.
/// - Each absence costs `absent_deduction_percent` of the daily rate and
///   each half-day costs `half_day_deduction_percent` of it.
/// - `present` and `late` records arriving more than
///   `late_threshold_minutes` after `expected_start_time` are late; every
///   minute after the start time then costs `late_deduction_per_minute`.
/// - Both deductions are rounded to `decimal_places`.
///
/// An empty slice yields zero deductions.
///
/// # Errors
///
/// - [`PayrollError::InvalidPeriod`] if any record is dated outside the
///   period
/// - [`PayrollError::InvalidArgument`] if a deduction leaves the decimal
///   range
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::evaluate_attendance;
/// use hr_payroll::config::AttendancePolicy;
/// use hr_payroll::models::{Attendance, AttendanceStatus, Period};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let absence = Attendance {
///     id: 1,
///     employee_id: 1,
///     date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
///     status: AttendanceStatus::Absent,
///     arrival_time: None,
/// };
///
/// let evaluation = evaluate_attendance(
///     &[absence],
///     Period::new(2025, 6).unwrap(),
///     Decimal::new(50000, 0),
///     &AttendancePolicy::default(),
///     2,
/// )
/// .unwrap();
///
/// assert_eq!(evaluation.attendance_deduction, Decimal::from_str("83.33").unwrap());
/// assert_eq!(evaluation.late_deduction, Decimal::ZERO);
/// ```
pub fn evaluate_attendance(
    records: &[Attendance],
    period: Period,
    basic_salary: Decimal,
    policy: &AttendancePolicy,
    decimal_places: u32,
) -> PayrollResult<AttendanceEvaluation> {
    let days = Decimal::from(period.days_in_month());
    let daily_rate = basic_salary
        .checked_div(days)
        .ok_or_else(|| PayrollError::overflow("basic_salary"))?;
    let mut evaluation = AttendanceEvaluation::empty(round_currency(daily_rate, decimal_places));

    let mut ordered: Vec<&Attendance> = records.iter().collect();
    ordered.sort_by_key(|record| record.date);

    for record in ordered {
        if !period.contains(record.date) {
            return Err(PayrollError::InvalidPeriod {
                message: format!(
                    "attendance on {} is outside {} (days 1-{})",
                    record.date,
                    period,
                    period.days_in_month()
                ),
            });
        }

        match record.status {
            AttendanceStatus::Absent => evaluation.absent_days += 1,
            AttendanceStatus::HalfDay => evaluation.half_days += 1,
            AttendanceStatus::Present | AttendanceStatus::Late => {}
        }

        if !record.status.counts_lateness() {
            continue;
        }
        if let Some(minutes) = record.arrival_time.and_then(|t| lateness(t, policy)) {
            evaluation.late_records.push(LateRecord {
                date: record.date,
                late_minutes: minutes,
            });
        }
    }

    // Percentages apply to the unrounded daily rate.
    let attendance_deduction = Decimal::from(evaluation.absent_days)
        .checked_mul(policy.absent_deduction_percent)
        .zip(Decimal::from(evaluation.half_days).checked_mul(policy.half_day_deduction_percent))
        .and_then(|(absent, half)| absent.checked_add(half))
        .and_then(|percent_of_daily| basic_salary.checked_mul(percent_of_daily))
        .and_then(|amount| amount.checked_div(HUNDRED * days))
        .ok_or_else(|| PayrollError::overflow("attendance_deduction"))?;
    let late_minutes_total = evaluation.total_late_minutes();
    let late_deduction = Decimal::from(late_minutes_total)
        .checked_mul(policy.late_deduction_per_minute)
        .ok_or_else(|| PayrollError::overflow("late_deduction"))?;

    evaluation.attendance_deduction = round_currency(attendance_deduction, decimal_places);
    evaluation.late_deduction = round_currency(late_deduction, decimal_places);

    debug!(
        period = %period,
        absent_days = evaluation.absent_days,
        half_days = evaluation.half_days,
        late_minutes = late_minutes_total,
        attendance_deduction = %evaluation.attendance_deduction,
        late_deduction = %evaluation.late_deduction,
        "Attendance evaluated"
    );

    Ok(evaluation)
}
