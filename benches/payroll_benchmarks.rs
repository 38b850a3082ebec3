//! Performance benchmarks for the HR payroll engine.
//!
//! - Attendance evaluation for a fully recorded month
//! - Payroll preview through the HTTP router
//! - Payroll generation for a batch of 100 employees
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{NaiveDate, NaiveTime};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use hr_payroll::api::{AppState, create_router};
use hr_payroll::auth::{ConfiguredAuthenticator, SessionStore};
use hr_payroll::calculation::evaluate_attendance;
use hr_payroll::config::{AttendancePolicy, AuthConfig, PolicyConfig};
use hr_payroll::models::{Attendance, AttendanceStatus, NewAttendance, Period};
use hr_payroll::service::{EmployeeInput, PayrollInput, PayrollService};

use axum::{body::Body, http::Request};
use rust_decimal::Decimal;
use tower::ServiceExt;

fn employee_input(i: usize) -> EmployeeInput {
    EmployeeInput {
        name: format!("Employee {}", i),
        email: format!("employee{}@company.name", i),
        position: "Analyst".to_string(),
        salary: Decimal::new(50_000 + i as i64 * 100, 0),
        salary_currency: None,
        join_date: NaiveDate::from_ymd_opt(2024, 1, 1),
    }
}

/// One record per day of the month, cycling through every status.
fn month_of_attendance(period: Period) -> Vec<Attendance> {
    let statuses = [
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::HalfDay,
        AttendanceStatus::Absent,
    ];

    (1..=period.days_in_month())
        .map(|day| {
            let status = statuses[day as usize % statuses.len()];
            Attendance {
                id: u64::from(day),
                employee_id: 1,
                date: period.date(day).unwrap(),
                status,
                arrival_time: status
                    .requires_arrival()
                    .then(|| NaiveTime::from_hms_opt(9, day % 60, 0).unwrap()),
            }
        })
        .collect()
}

/// A service with `employees` staff and a month of attendance each.
fn populated_service(employees: usize) -> PayrollService {
    let service = PayrollService::in_memory(PolicyConfig::default());
    let period = Period::new(2025, 3).unwrap();

    for i in 0..employees {
        let employee = service.create_employee(employee_input(i)).unwrap();
        for record in month_of_attendance(period) {
            service
                .record_attendance(NewAttendance {
                    employee_id: employee.id,
                    date: record.date,
                    status: record.status,
                    arrival_time: record.arrival_time,
                })
                .unwrap();
        }
    }
    service
}

/// Benchmark: evaluating one fully recorded month.
fn bench_evaluate_month(c: &mut Criterion) {
    let policy = AttendancePolicy::default();
    let mut group = c.benchmark_group("evaluate_attendance");

    for month in [2u32, 3] {
        let period = Period::new(2025, month).unwrap();
        let records = month_of_attendance(period);
        group.bench_with_input(BenchmarkId::from_parameter(period), &records, |b, records| {
            b.iter(|| {
                evaluate_attendance(
                    black_box(records),
                    period,
                    Decimal::new(50_000, 0),
                    &policy,
                    2,
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

/// Benchmark: payroll preview through the router.
fn bench_preview_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(
        populated_service(1),
        ConfiguredAuthenticator::new(&AuthConfig::default()),
        SessionStore::new(60),
    );
    let token = state.sessions().issue("bench").unwrap().token;
    let router = create_router(state);

    c.bench_function("preview_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .uri("/payroll/preview/1/2025/3")
                        .header("Authorization", format!("Bearer {}", token))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: generating payroll for 100 employees.
fn bench_batch_100(c: &mut Criterion) {
    let service = populated_service(100);

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));
    group.bench_function("generate_payroll_100", |b| {
        b.iter(|| {
            for employee_id in 1..=100u64 {
                let payroll = service
                    .generate_payroll(PayrollInput {
                        employee_id,
                        year: 2025,
                        month: 3,
                        additional_deductions: Decimal::ZERO,
                        additional_allowances: Decimal::new(500, 0),
                        hr_comments: None,
                    })
                    .unwrap();
                black_box(payroll);
            }
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate_month,
    bench_preview_request,
    bench_batch_100
);
criterion_main!(benches);
