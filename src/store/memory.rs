//! In-memory record store.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RegenerationPolicy;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Attendance, AttendanceFilter, AttendanceId, DeletionSummary, Employee, EmployeeId,
    NewAttendance, NewEmployee, NewPayroll, Payroll, PayrollFilter, PayrollId, PayrollStatus,
};

use super::RecordStore;

/// Tables held in process memory.
///
/// The struct is serializable so [`super::JsonFileStore`] can persist it
/// as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    last_employee_id: EmployeeId,
    last_attendance_id: AttendanceId,
    last_payroll_id: PayrollId,
    employees: BTreeMap<EmployeeId, Employee>,
    attendance: BTreeMap<AttendanceId, Attendance>,
    payroll: BTreeMap<PayrollId, Payroll>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the invariants every store holds: ids match their keys and
    /// never exceed the id counters, emails and (employee, date) pairs are
    /// unique, children reference existing employees, and every payroll
    /// has a valid period and a consistent net salary.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::Storage`] describing the first violation.
    pub fn check_consistency(&self) -> PayrollResult<()> {
        check_table("employee", &self.employees, self.last_employee_id, |e: &Employee| e.id)?;
        check_table("attendance", &self.attendance, self.last_attendance_id, |a: &Attendance| {
            a.id
        })?;
        check_table("payroll", &self.payroll, self.last_payroll_id, |p: &Payroll| p.id)?;

        let mut emails = HashSet::new();
        for employee in self.employees.values() {
            if !emails.insert(employee.email.to_ascii_lowercase()) {
                return Err(PayrollError::storage(format!(
                    "email {} belongs to more than one employee",
                    employee.email
                )));
            }
        }

        let mut days = HashSet::new();
        for record in self.attendance.values() {
            self.require_stored_employee("attendance", record.id, record.employee_id)?;
            if !days.insert((record.employee_id, record.date)) {
                return Err(PayrollError::storage(format!(
                    "attendance for employee {} on {} is recorded twice",
                    record.employee_id, record.date
                )));
            }
        }

        for payroll in self.payroll.values() {
            self.require_stored_employee("payroll", payroll.id, payroll.employee_id)?;
            payroll
                .period()
                .and_then(|_| payroll.check_net_salary())
                .map_err(|e| PayrollError::storage(format!("payroll {}: {}", payroll.id, e)))?;
        }

        Ok(())
    }

    fn require_stored_employee(
        &self,
        entity: &str,
        id: u64,
        employee_id: EmployeeId,
    ) -> PayrollResult<()> {
        if self.employees.contains_key(&employee_id) {
            return Ok(());
        }
        Err(PayrollError::storage(format!(
            "{} {} references missing employee {}",
            entity, id, employee_id
        )))
    }

    fn require_employee(&self, entity: &str, employee_id: EmployeeId) -> PayrollResult<()> {
        if self.employees.contains_key(&employee_id) {
            Ok(())
        } else {
            Err(PayrollError::ReferentialIntegrity {
                entity: entity.to_string(),
                employee_id,
            })
        }
    }
}

/// Every record sits under its own id and no id is past the counter.
fn check_table<T>(
    entity: &str,
    table: &BTreeMap<u64, T>,
    last_id: u64,
    id_of: impl Fn(&T) -> u64,
) -> PayrollResult<()> {
    if let Some((key, record)) = table.iter().find(|(key, record)| id_of(record) != **key) {
        return Err(PayrollError::storage(format!(
            "{} stored under key {} has id {}",
            entity,
            key,
            id_of(record)
        )));
    }
    if let Some(max) = table.keys().next_back().filter(|max| **max > last_id) {
        return Err(PayrollError::storage(format!(
            "{} id {} is past the id counter {}",
            entity, max, last_id
        )));
    }
    Ok(())
}

impl RecordStore for MemoryStore {
    fn create_employee(&mut self, employee: NewEmployee) -> PayrollResult<Employee> {
        if self
            .employees
            .values()
            .any(|e| e.email.eq_ignore_ascii_case(&employee.email))
        {
            return Err(PayrollError::Conflict {
                message: format!("an employee with email {} already exists", employee.email),
            });
        }

        self.last_employee_id += 1;
        let employee = employee.into_employee(self.last_employee_id);
        self.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    fn list_employees(&self) -> Vec<Employee> {
        self.employees.values().cloned().collect()
    }

    fn get_employee(&self, id: EmployeeId) -> PayrollResult<Employee> {
        self.employees
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("employee", id))
    }

    fn delete_employee(&mut self, id: EmployeeId) -> PayrollResult<DeletionSummary> {
        if self.employees.remove(&id).is_none() {
            return Err(PayrollError::not_found("employee", id));
        }

        let attendance_before = self.attendance.len();
        self.attendance.retain(|_, a| a.employee_id != id);
        let payroll_before = self.payroll.len();
        self.payroll.retain(|_, p| p.employee_id != id);

        let summary = DeletionSummary {
            employee_id: id,
            attendance_removed: attendance_before - self.attendance.len(),
            payroll_removed: payroll_before - self.payroll.len(),
        };
        debug!(?summary, "Employee deleted with dependent records");
        Ok(summary)
    }

    fn create_attendance(&mut self, attendance: NewAttendance) -> PayrollResult<Attendance> {
        self.require_employee("attendance", attendance.employee_id)?;

        if self
            .attendance
            .values()
            .any(|a| a.employee_id == attendance.employee_id && a.date == attendance.date)
        {
            return Err(PayrollError::Conflict {
                message: format!(
                    "attendance for employee {} on {} is already recorded",
                    attendance.employee_id, attendance.date
                ),
            });
        }

        self.last_attendance_id += 1;
        let attendance = attendance.into_attendance(self.last_attendance_id);
        self.attendance.insert(attendance.id, attendance.clone());
        Ok(attendance)
    }

    fn list_attendance(&self, filter: &AttendanceFilter) -> Vec<Attendance> {
        let mut records: Vec<Attendance> = self
            .attendance
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        records.sort_by_key(|a| (a.date, a.id));
        records
    }

    fn get_attendance(&self, id: AttendanceId) -> PayrollResult<Attendance> {
        self.attendance
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("attendance", id))
    }

    fn delete_attendance(&mut self, id: AttendanceId) -> PayrollResult<()> {
        self.attendance
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PayrollError::not_found("attendance", id))
    }

    fn create_payroll(
        &mut self,
        payroll: NewPayroll,
        regeneration: RegenerationPolicy,
    ) -> PayrollResult<Payroll> {
        self.require_employee("payroll", payroll.employee_id)?;
        payroll.check_net_salary()?;

        if regeneration == RegenerationPolicy::Replace {
            let filter = PayrollFilter::for_period(payroll.employee_id, payroll.period);
            let before = self.payroll.len();
            self.payroll.retain(|_, p| !filter.matches(p));
            let replaced = before - self.payroll.len();
            if replaced > 0 {
                debug!(
                    employee_id = payroll.employee_id,
                    period = %payroll.period,
                    replaced,
                    "Replacing earlier payroll records"
                );
            }
        }

        self.last_payroll_id += 1;
        let payroll = payroll.into_payroll(self.last_payroll_id);
        self.payroll.insert(payroll.id, payroll.clone());
        Ok(payroll)
    }

    fn list_payroll(&self, filter: &PayrollFilter) -> Vec<Payroll> {
        self.payroll
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    fn get_payroll(&self, id: PayrollId) -> PayrollResult<Payroll> {
        self.payroll
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("payroll", id))
    }

    fn update_payroll_status(
        &mut self,
        id: PayrollId,
        status: PayrollStatus,
    ) -> PayrollResult<Payroll> {
        let payroll = self
            .payroll
            .get_mut(&id)
            .ok_or_else(|| PayrollError::not_found("payroll", id))?;
        payroll.status = status;
        Ok(payroll.clone())
    }

    fn delete_payroll(&mut self, id: PayrollId) -> PayrollResult<()> {
        self.payroll
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PayrollError::not_found("payroll", id))
    }

    fn clear(&mut self) -> PayrollResult<()> {
        *self = Self::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, Period};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn new_employee(email: &str) -> NewEmployee {
        NewEmployee {
            name: "A".to_string(),
            email: email.to_string(),
            position: "Clerk".to_string(),
            salary: dec("50000"),
            join_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn absence(employee_id: EmployeeId, day: u32) -> NewAttendance {
        NewAttendance {
            employee_id,
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            status: AttendanceStatus::Absent,
            arrival_time: None,
        }
    }

    fn new_payroll(employee_id: EmployeeId) -> NewPayroll {
        NewPayroll {
            employee_id,
            period: Period::new(2025, 6).unwrap(),
            basic_salary: dec("50000"),
            attendance_deduction: dec("83.33"),
            late_deduction: Decimal::ZERO,
            additional_deductions: Decimal::ZERO,
            additional_allowances: Decimal::ZERO,
            net_salary: dec("49916.67"),
            hr_comments: None,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut store = MemoryStore::new();
        let first = store.create_employee(new_employee("a@x.io")).unwrap();
        let second = store.create_employee(new_employee("b@x.io")).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.list_employees().len(), 2);
    }

    #[test]
    fn test_duplicate_email_rejected_case_insensitively() {
        let mut store = MemoryStore::new();
        store.create_employee(new_employee("a@x.io")).unwrap();

        let result = store.create_employee(new_employee("A@X.io"));
        assert!(matches!(result, Err(PayrollError::Conflict { .. })));
        assert_eq!(store.list_employees().len(), 1);
    }

    #[test]
    fn test_get_missing_employee() {
        let store = MemoryStore::new();
        match store.get_employee(5) {
            Err(PayrollError::NotFound { entity, id }) => {
                assert_eq!(entity, "employee");
                assert_eq!(id, 5);
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_attendance_for_missing_employee_rejected() {
        let mut store = MemoryStore::new();
        let result = store.create_attendance(absence(42, 2));

        assert!(matches!(
            result,
            Err(PayrollError::ReferentialIntegrity { employee_id: 42, .. })
        ));
        assert!(store.list_attendance(&AttendanceFilter::default()).is_empty());
    }

    #[test]
    fn test_duplicate_attendance_date_rejected() {
        let mut store = MemoryStore::new();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        store.create_attendance(absence(employee.id, 2)).unwrap();

        let mut again = absence(employee.id, 2);
        again.status = AttendanceStatus::Present;
        again.arrival_time = NaiveTime::from_hms_opt(9, 0, 0);
        assert!(matches!(
            store.create_attendance(again),
            Err(PayrollError::Conflict { .. })
        ));
    }

    #[test]
    fn test_attendance_listed_in_date_order() {
        let mut store = MemoryStore::new();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        store.create_attendance(absence(employee.id, 9)).unwrap();
        store.create_attendance(absence(employee.id, 3)).unwrap();

        let days: Vec<_> = store
            .list_attendance(&AttendanceFilter::default())
            .iter()
            .map(|a| a.date)
            .collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
            ]
        );
    }

    #[test]
    fn test_delete_employee_cascades() {
        let mut store = MemoryStore::new();
        let keep = store.create_employee(new_employee("keep@x.io")).unwrap();
        let gone = store.create_employee(new_employee("gone@x.io")).unwrap();

        store.create_attendance(absence(keep.id, 2)).unwrap();
        store.create_attendance(absence(gone.id, 2)).unwrap();
        store.create_attendance(absence(gone.id, 3)).unwrap();
        store
            .create_payroll(new_payroll(gone.id), RegenerationPolicy::KeepHistory)
            .unwrap();
        store
            .create_payroll(new_payroll(keep.id), RegenerationPolicy::KeepHistory)
            .unwrap();

        let summary = store.delete_employee(gone.id).unwrap();
        assert_eq!(summary.attendance_removed, 2);
        assert_eq!(summary.payroll_removed, 1);

        let gone_attendance = AttendanceFilter {
            employee_id: Some(gone.id),
            period: None,
        };
        let gone_payroll = PayrollFilter {
            employee_id: Some(gone.id),
            ..Default::default()
        };
        assert!(store.list_attendance(&gone_attendance).is_empty());
        assert!(store.list_payroll(&gone_payroll).is_empty());
        assert_eq!(store.list_attendance(&AttendanceFilter::default()).len(), 1);
        assert_eq!(store.list_payroll(&PayrollFilter::default()).len(), 1);
    }

    #[test]
    fn test_delete_missing_employee() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.delete_employee(1),
            Err(PayrollError::NotFound { .. })
        ));
    }

    #[test]
    fn test_payroll_for_missing_employee_rejected() {
        let mut store = MemoryStore::new();
        let result = store.create_payroll(new_payroll(3), RegenerationPolicy::KeepHistory);
        assert!(matches!(
            result,
            Err(PayrollError::ReferentialIntegrity { employee_id: 3, .. })
        ));
    }

    #[test]
    fn test_inconsistent_payroll_rejected() {
        let mut store = MemoryStore::new();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        let mut payroll = new_payroll(employee.id);
        payroll.net_salary = dec("50000");

        assert!(store
            .create_payroll(payroll, RegenerationPolicy::KeepHistory)
            .is_err());
        assert!(store.list_payroll(&PayrollFilter::default()).is_empty());
    }

    #[test]
    fn test_keep_history_inserts_again() {
        let mut store = MemoryStore::new();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        store
            .create_payroll(new_payroll(employee.id), RegenerationPolicy::KeepHistory)
            .unwrap();
        store
            .create_payroll(new_payroll(employee.id), RegenerationPolicy::KeepHistory)
            .unwrap();

        assert_eq!(store.list_payroll(&PayrollFilter::default()).len(), 2);
    }

    #[test]
    fn test_replace_removes_earlier_period_records() {
        let mut store = MemoryStore::new();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        let first = store
            .create_payroll(new_payroll(employee.id), RegenerationPolicy::KeepHistory)
            .unwrap();

        let mut july = new_payroll(employee.id);
        july.period = Period::new(2025, 7).unwrap();
        store
            .create_payroll(july, RegenerationPolicy::KeepHistory)
            .unwrap();

        let second = store
            .create_payroll(new_payroll(employee.id), RegenerationPolicy::Replace)
            .unwrap();

        let all = store.list_payroll(&PayrollFilter::default());
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|p| p.id != first.id));
        assert!(all.iter().any(|p| p.id == second.id));
    }

    #[test]
    fn test_update_payroll_status() {
        let mut store = MemoryStore::new();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        let payroll = store
            .create_payroll(new_payroll(employee.id), RegenerationPolicy::KeepHistory)
            .unwrap();

        let paid = store
            .update_payroll_status(payroll.id, PayrollStatus::Paid)
            .unwrap();
        assert_eq!(paid.status, PayrollStatus::Paid);
        assert_eq!(paid.net_salary, payroll.net_salary);
        assert_eq!(
            store.get_payroll(payroll.id).unwrap().status,
            PayrollStatus::Paid
        );
    }

    #[test]
    fn test_delete_attendance_and_payroll() {
        let mut store = MemoryStore::new();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        let attendance = store.create_attendance(absence(employee.id, 2)).unwrap();
        let payroll = store
            .create_payroll(new_payroll(employee.id), RegenerationPolicy::KeepHistory)
            .unwrap();

        store.delete_attendance(attendance.id).unwrap();
        store.delete_payroll(payroll.id).unwrap();

        assert!(store.get_attendance(attendance.id).is_err());
        assert!(store.get_payroll(payroll.id).is_err());
        assert!(store.delete_attendance(attendance.id).is_err());
    }

    #[test]
    fn test_clear_resets_ids() {
        let mut store = MemoryStore::new();
        store.create_employee(new_employee("a@x.io")).unwrap();
        store.clear().unwrap();

        assert!(store.list_employees().is_empty());
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        assert_eq!(employee.id, 1);
    }

    #[test]
    fn test_json_round_trip_keeps_sequences() {
        let mut store = MemoryStore::new();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        store.create_attendance(absence(employee.id, 2)).unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let mut restored: MemoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, store);

        let next = restored.create_employee(new_employee("b@x.io")).unwrap();
        assert_eq!(next.id, 2);
    }

    fn populated() -> MemoryStore {
        let mut store = MemoryStore::new();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        store.create_attendance(absence(employee.id, 2)).unwrap();
        store
            .create_payroll(new_payroll(employee.id), RegenerationPolicy::KeepHistory)
            .unwrap();
        store
    }

    fn assert_storage_error(store: &MemoryStore, fragment: &str) {
        match store.check_consistency() {
            Err(PayrollError::Storage { message }) => {
                assert!(message.contains(fragment), "unexpected message: {}", message)
            }
            other => panic!("Expected Storage error, got {:?}", other),
        }
    }

    #[test]
    fn test_consistency_of_built_store() {
        assert!(populated().check_consistency().is_ok());
        assert!(MemoryStore::new().check_consistency().is_ok());
    }

    #[test]
    fn test_consistency_rejects_counter_behind_ids() {
        let mut store = populated();
        store.last_employee_id = 0;
        assert_storage_error(&store, "past the id counter");
    }

    #[test]
    fn test_consistency_rejects_mismatched_key() {
        let mut store = populated();
        let employee = store.employees.remove(&1).unwrap();
        store.employees.insert(7, employee);
        store.last_employee_id = 7;
        assert_storage_error(&store, "stored under key 7");
    }

    #[test]
    fn test_consistency_rejects_orphan_attendance() {
        let mut store = populated();
        store.payroll.clear();
        store.employees.clear();
        assert_storage_error(&store, "attendance 1 references missing employee 1");
    }

    #[test]
    fn test_consistency_rejects_payroll_drift() {
        let mut store = populated();
        if let Some(payroll) = store.payroll.get_mut(&1) {
            payroll.net_salary = dec("1");
        }
        assert_storage_error(&store, "payroll 1");
    }

    #[test]
    fn test_consistency_rejects_duplicate_email() {
        let mut store = populated();
        let mut twin = store.employees[&1].clone();
        twin.id = 2;
        twin.email = "A@X.IO".to_string();
        store.employees.insert(2, twin);
        store.last_employee_id = 2;
        assert_storage_error(&store, "more than one employee");
    }
}
