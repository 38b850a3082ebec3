//! Property tests for the attendance evaluator and the payroll calculator.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;
use rust_decimal::Decimal;

use hr_payroll::calculation::{PayrollAdjustments, build_payroll, evaluate_attendance};
use hr_payroll::config::{AttendancePolicy, PolicyConfig};
use hr_payroll::models::{
    Attendance, AttendanceFilter, AttendanceStatus, Employee, NewAttendance, Period,
};
use hr_payroll::service::{EmployeeInput, PayrollInput, PayrollService};

const STATUSES: [AttendanceStatus; 4] = [
    AttendanceStatus::Present,
    AttendanceStatus::Absent,
    AttendanceStatus::HalfDay,
    AttendanceStatus::Late,
];

/// An amount with two decimal places between 0 and `max_units`.
fn amount(max_units: i64) -> impl Strategy<Value = Decimal> {
    (0..=max_units * 100).prop_map(|cents| Decimal::new(cents, 2))
}

fn salary() -> impl Strategy<Value = Decimal> {
    (100_00i64..=5_000_000_00).prop_map(|cents| Decimal::new(cents, 2))
}

fn period() -> impl Strategy<Value = Period> {
    (2000i32..=2025, 1u32..=12).prop_map(|(year, month)| Period::new(year, month).unwrap())
}

/// Attendance for distinct days of the month, as (day, status, minutes after 08:30).
fn attendance_days() -> impl Strategy<Value = BTreeMap<u32, (usize, u32)>> {
    prop::collection::btree_map(1u32..=28, (0usize..4, 0u32..=180), 0..20)
}

fn records(period: Period, days: &BTreeMap<u32, (usize, u32)>) -> Vec<Attendance> {
    let start = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
    days.iter()
        .enumerate()
        .map(|(i, (&day, &(status, offset)))| {
            let status = STATUSES[status];
            Attendance {
                id: i as u64 + 1,
                employee_id: 1,
                date: period.date(day).unwrap(),
                status,
                arrival_time: status
                    .requires_arrival()
                    .then(|| start + chrono::Duration::minutes(i64::from(offset))),
            }
        })
        .collect()
}

fn employee(salary: Decimal) -> Employee {
    Employee {
        id: 1,
        name: "Asha Rao".to_string(),
        email: "asha@company.name".to_string(),
        position: "Accountant".to_string(),
        salary,
        join_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
    }
}

proptest! {
    #[test]
    fn net_salary_matches_components(
        salary in salary(),
        period in period(),
        days in attendance_days(),
        deductions in amount(20_000),
        allowances in amount(20_000),
    ) {
        let policy = AttendancePolicy::default();
        let evaluation =
            evaluate_attendance(&records(period, &days), period, salary, &policy, 2).unwrap();
        let max_amount = PolicyConfig::default().currency.max_amount;
        let adjustments = PayrollAdjustments::new(deductions, allowances, max_amount).unwrap();

        let payroll = build_payroll(
            &employee(salary),
            period,
            &evaluation,
            &adjustments,
            None,
            chrono::Utc::now(),
        )
        .unwrap();

        prop_assert_eq!(
            payroll.net_salary,
            payroll.basic_salary
                - payroll.attendance_deduction
                - payroll.late_deduction
                - payroll.additional_deductions
                + payroll.additional_allowances
        );
        prop_assert!(payroll.check_net_salary().is_ok());
    }

    #[test]
    fn deductions_are_rounded_and_non_negative(
        salary in salary(),
        period in period(),
        days in attendance_days(),
    ) {
        let evaluation = evaluate_attendance(
            &records(period, &days),
            period,
            salary,
            &AttendancePolicy::default(),
            2,
        )
        .unwrap();

        prop_assert!(evaluation.attendance_deduction >= Decimal::ZERO);
        prop_assert!(evaluation.late_deduction >= Decimal::ZERO);
        prop_assert_eq!(evaluation.attendance_deduction, evaluation.attendance_deduction.round_dp(2));
        prop_assert_eq!(evaluation.late_deduction, evaluation.late_deduction.round_dp(2));
    }

    #[test]
    fn extra_absence_never_lowers_deduction(
        salary in salary(),
        period in period(),
        days in attendance_days(),
    ) {
        let policy = AttendancePolicy::default();
        let mut records = records(period, &days);
        let before = evaluate_attendance(&records, period, salary, &policy, 2).unwrap();

        records.push(Attendance {
            id: 100,
            employee_id: 1,
            date: period.date(period.days_in_month()).unwrap(),
            status: AttendanceStatus::Absent,
            arrival_time: None,
        });
        let after = evaluate_attendance(&records, period, salary, &policy, 2).unwrap();

        prop_assert!(after.attendance_deduction >= before.attendance_deduction);
        prop_assert_eq!(after.late_deduction, before.late_deduction);
        prop_assert_eq!(after.absent_days, before.absent_days + 1);
    }

    #[test]
    fn late_records_are_over_threshold(
        salary in salary(),
        period in period(),
        days in attendance_days(),
    ) {
        let policy = AttendancePolicy::default();
        let evaluation =
            evaluate_attendance(&records(period, &days), period, salary, &policy, 2).unwrap();

        for late in &evaluation.late_records {
            prop_assert!(late.late_minutes > policy.late_threshold_minutes);
        }
        prop_assert_eq!(
            evaluation.late_deduction,
            Decimal::from(evaluation.total_late_minutes()) * policy.late_deduction_per_minute
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn generated_payroll_satisfies_identity(
        salary in salary(),
        days in attendance_days(),
        deductions in amount(5_000),
        allowances in amount(5_000),
    ) {
        let service = PayrollService::in_memory(PolicyConfig::default());
        let employee = service
            .create_employee(EmployeeInput {
                name: "Asha Rao".to_string(),
                email: "asha@company.name".to_string(),
                position: "Accountant".to_string(),
                salary,
                salary_currency: None,
                join_date: None,
            })
            .unwrap();

        let period = Period::new(2024, 2).unwrap();
        for record in records(period, &days) {
            service
                .record_attendance(NewAttendance {
                    employee_id: employee.id,
                    date: record.date,
                    status: record.status,
                    arrival_time: record.arrival_time,
                })
                .unwrap();
        }

        let payroll = service
            .generate_payroll(PayrollInput {
                employee_id: employee.id,
                year: 2024,
                month: 2,
                additional_deductions: deductions,
                additional_allowances: allowances,
                hr_comments: None,
            })
            .unwrap();

        prop_assert_eq!(
            payroll.net_salary,
            payroll.basic_salary
                - payroll.attendance_deduction
                - payroll.late_deduction
                - payroll.additional_deductions
                + payroll.additional_allowances
        );

        let stored = service
            .list_attendance(&AttendanceFilter::for_period(employee.id, period))
            .unwrap();
        prop_assert_eq!(stored.len(), days.len());
    }
}
