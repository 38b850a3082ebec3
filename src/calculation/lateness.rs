//! Late arrival measurement.

use chrono::NaiveTime;

use crate::config::AttendancePolicy;

/// Whole minutes an arrival falls after the expected start of the day.
///
/// Arrivals at or before the start time yield zero. Seconds are truncated,
/// so 09:15:59 against a 09:00 start is 15 minutes.
///
/// # Examples
///
/// ```
/// use hr_payroll::calculation::late_minutes;
/// use hr_payroll::config::AttendancePolicy;
/// use chrono::NaiveTime;
///
/// let policy = AttendancePolicy::default();
/// let arrival = NaiveTime::from_hms_opt(9, 40, 0).unwrap();
/// assert_eq!(late_minutes(arrival, &policy), 40);
///
/// let early = NaiveTime::from_hms_opt(8, 50, 0).unwrap();
/// assert_eq!(late_minutes(early, &policy), 0);
/// ```
pub fn late_minutes(arrival: NaiveTime, policy: &AttendancePolicy) -> u32 {
    let minutes = (arrival - policy.expected_start_time).num_minutes();
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}

/// Late minutes for an arrival, or `None` if it is within the threshold.
pub fn lateness(arrival: NaiveTime, policy: &AttendancePolicy) -> Option<u32> {
    let minutes = late_minutes(arrival, policy);
    policy.is_late(minutes).then_some(minutes)
}
