//! Record store persisted to a JSON file.
//!
//! The whole store is one JSON document. Every mutation is applied to a
//! staged copy, the copy is written to a temporary file that is renamed
//! over the data file, and only then does the staged copy become current.
//! A failed write leaves both the file and the in-memory tables untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::RegenerationPolicy;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Attendance, AttendanceFilter, AttendanceId, DeletionSummary, Employee, EmployeeId,
    NewAttendance, NewEmployee, NewPayroll, Payroll, PayrollFilter, PayrollId, PayrollStatus,
};

use super::{MemoryStore, RecordStore};

/// A [`MemoryStore`] mirrored to a JSON file on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: MemoryStore,
}

impl JsonFileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file opens as an empty store; the file is created on the
    /// first change.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::Storage`] if the file exists but cannot be
    /// read, is not a valid store document, or breaks a store invariant
    /// (see [`MemoryStore::check_consistency`]).
    pub fn open<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref().to_path_buf();

        let records = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                PayrollError::storage(format!("failed to read {}: {}", path.display(), e))
            })?;
            let records: MemoryStore = serde_json::from_str(&content).map_err(|e| {
                PayrollError::storage(format!("failed to parse {}: {}", path.display(), e))
            })?;
            records.check_consistency().inspect_err(|e| {
                warn!(path = %path.display(), error = %e, "Store file is inconsistent")
            })?;
            records
        } else {
            MemoryStore::new()
        };

        info!(path = %path.display(), "Opened JSON file store");
        Ok(Self { path, records })
    }

    /// Applies `change` to a staged copy and persists it before making it
    /// current.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryStore) -> PayrollResult<T>,
    ) -> PayrollResult<T> {
        let mut staged = self.records.clone();
        let output = change(&mut staged)?;
        self.persist(&staged)?;
        self.records = staged;
        Ok(output)
    }

    fn persist(&self, records: &MemoryStore) -> PayrollResult<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| PayrollError::storage(format!("failed to encode store: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                PayrollError::storage(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let write_synced = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()
        };
        write_synced().map_err(|e| {
            PayrollError::storage(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            PayrollError::storage(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl RecordStore for JsonFileStore {
    fn create_employee(&mut self, employee: NewEmployee) -> PayrollResult<Employee> {
        self.commit(|records| records.create_employee(employee))
    }

    fn list_employees(&self) -> Vec<Employee> {
        self.records.list_employees()
    }

    fn get_employee(&self, id: EmployeeId) -> PayrollResult<Employee> {
        self.records.get_employee(id)
    }

    fn delete_employee(&mut self, id: EmployeeId) -> PayrollResult<DeletionSummary> {
        self.commit(|records| records.delete_employee(id))
    }

    fn create_attendance(&mut self, attendance: NewAttendance) -> PayrollResult<Attendance> {
        self.commit(|records| records.create_attendance(attendance))
    }

    fn list_attendance(&self, filter: &AttendanceFilter) -> Vec<Attendance> {
        self.records.list_attendance(filter)
    }

    fn get_attendance(&self, id: AttendanceId) -> PayrollResult<Attendance> {
        self.records.get_attendance(id)
    }

    fn delete_attendance(&mut self, id: AttendanceId) -> PayrollResult<()> {
        self.commit(|records| records.delete_attendance(id))
    }

    fn create_payroll(
        &mut self,
        payroll: NewPayroll,
        regeneration: RegenerationPolicy,
    ) -> PayrollResult<Payroll> {
        self.commit(|records| records.create_payroll(payroll, regeneration))
    }

    fn list_payroll(&self, filter: &PayrollFilter) -> Vec<Payroll> {
        self.records.list_payroll(filter)
    }

    fn get_payroll(&self, id: PayrollId) -> PayrollResult<Payroll> {
        self.records.get_payroll(id)
    }

    fn update_payroll_status(
        &mut self,
        id: PayrollId,
        status: PayrollStatus,
    ) -> PayrollResult<Payroll> {
        self.commit(|records| records.update_payroll_status(id, status))
    }

    fn delete_payroll(&mut self, id: PayrollId) -> PayrollResult<()> {
        self.commit(|records| records.delete_payroll(id))
    }

    fn clear(&mut self) -> PayrollResult<()> {
        self.commit(|records| records.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("hr-payroll-{}", Uuid::new_v4()))
            .join("payroll.json")
    }

    fn new_employee(email: &str) -> NewEmployee {
        NewEmployee {
            name: "A".to_string(),
            email: email.to_string(),
            position: "Clerk".to_string(),
            salary: Decimal::new(50000, 0),
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

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let path = temp_path();
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.list_employees().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_changes_survive_reopen() {
        let path = temp_path();
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            let employee = store.create_employee(new_employee("a@x.io")).unwrap();
            store.create_attendance(absence(employee.id, 2)).unwrap();
        }

        let mut reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.list_employees().len(), 1);
        assert_eq!(
            reopened.list_attendance(&AttendanceFilter::default()).len(),
            1
        );
        let next = reopened.create_employee(new_employee("b@x.io")).unwrap();
        assert_eq!(next.id, 2);

        cleanup(&path);
    }

    #[test]
    fn test_failed_validation_leaves_file_untouched() {
        let path = temp_path();
        let mut store = JsonFileStore::open(&path).unwrap();
        store.create_employee(new_employee("a@x.io")).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert!(store.create_attendance(absence(99, 2)).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        cleanup(&path);
    }

    #[test]
    fn test_failed_write_rolls_back_cascade() {
        let path = temp_path();
        let mut store = JsonFileStore::open(&path).unwrap();
        let employee = store.create_employee(new_employee("a@x.io")).unwrap();
        store.create_attendance(absence(employee.id, 2)).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // A directory where the temp file should go makes the write fail.
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        fs::create_dir_all(PathBuf::from(&tmp)).unwrap();

        let result = store.delete_employee(employee.id);
        assert!(matches!(result, Err(PayrollError::Storage { .. })));

        assert_eq!(store.list_employees().len(), 1);
        assert_eq!(store.list_attendance(&AttendanceFilter::default()).len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        cleanup(&path);
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(PayrollError::Storage { .. })
        ));

        cleanup(&path);
    }

    /// Writes a store with one employee and one absence, then lets the
    /// caller edit the raw document.
    fn write_edited_document(path: &Path, edit: impl FnOnce(&mut serde_json::Value)) {
        {
            let mut store = JsonFileStore::open(path).unwrap();
            let employee = store.create_employee(new_employee("old@x.io")).unwrap();
            store.create_attendance(absence(employee.id, 2)).unwrap();
        }
        let mut document: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        edit(&mut document);
        fs::write(path, document.to_string()).unwrap();
    }

    #[test]
    fn test_missing_id_counter_rejected() {
        let path = temp_path();
        write_edited_document(&path, |document| {
            document.as_object_mut().unwrap().remove("last_employee_id");
        });

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(PayrollError::Storage { .. })
        ));

        cleanup(&path);
    }

    #[test]
    fn test_counter_behind_stored_ids_rejected() {
        let path = temp_path();
        write_edited_document(&path, |document| {
            document["last_employee_id"] = serde_json::json!(0);
        });

        match JsonFileStore::open(&path) {
            Err(PayrollError::Storage { message }) => {
                assert!(message.contains("past the id counter"))
            }
            other => panic!("Expected Storage error, got {:?}", other.map(|_| ())),
        }

        cleanup(&path);
    }

    #[test]
    fn test_orphan_attendance_rejected() {
        let path = temp_path();
        write_edited_document(&path, |document| {
            document["employees"].as_object_mut().unwrap().clear();
        });

        match JsonFileStore::open(&path) {
            Err(PayrollError::Storage { message }) => {
                assert!(message.contains("references missing employee"))
            }
            other => panic!("Expected Storage error, got {:?}", other.map(|_| ())),
        }

        cleanup(&path);
    }

    #[test]
    fn test_clear_persists_empty_store() {
        let path = temp_path();
        let mut store = JsonFileStore::open(&path).unwrap();
        store.create_employee(new_employee("a@x.io")).unwrap();
        store.clear().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.list_employees().is_empty());

        cleanup(&path);
    }
}
