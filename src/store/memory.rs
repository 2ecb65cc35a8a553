//! In-process backend. Every table sits behind its own `RwLock`; the
//! duplicate check for check-ins and the status compare-and-swap for leave
//! decisions run under a single write guard so they stay atomic.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{
    AttendanceStore, GeofenceStore, LeaveStore, StoreError, StoreResult, Upserted,
};
use crate::model::{
    attendance::{AttendanceEntry, AttendanceRecord, AttendanceStatus, NewAttendance},
    geofence::{GeofenceConfig, GeofenceDraft},
    leave_request::{LeaveDecision, LeaveEntry, LeaveRequest, LeaveStatus, NewLeave},
};

#[derive(Default)]
pub struct MemoryStore {
    geofence: RwLock<Option<GeofenceConfig>>,
    attendance: RwLock<Vec<AttendanceRecord>>,
    leaves: RwLock<Vec<LeaveRequest>>,
    employees: RwLock<HashMap<u64, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a display name used when HR listings are joined with employees.
    pub fn register_employee(&self, employee_id: u64, name: impl Into<String>) {
        self.employees
            .write()
            .expect("employee directory poisoned")
            .insert(employee_id, name.into());
    }

    fn employee_name(&self, employee_id: u64) -> Option<String> {
        self.employees
            .read()
            .expect("employee directory poisoned")
            .get(&employee_id)
            .cloned()
    }
}

fn attendance_order(records: &mut [AttendanceRecord]) {
    records.sort_by_key(|r| Reverse((r.attendance_date, r.time_in, r.attendance_id)));
}

#[async_trait]
impl GeofenceStore for MemoryStore {
    async fn get(&self) -> StoreResult<Option<GeofenceConfig>> {
        Ok(self.geofence.read().expect("geofence poisoned").clone())
    }

    async fn upsert(&self, draft: GeofenceDraft) -> StoreResult<Upserted> {
        let mut slot = self.geofence.write().expect("geofence poisoned");
        let created = slot.is_none();
        let config = GeofenceConfig {
            location_name: draft.location_name,
            center: draft.center,
            radius_meters: draft.radius_meters,
            set_by: draft.set_by,
            set_at: Utc::now(),
        };
        *slot = Some(config.clone());
        Ok(Upserted { config, created })
    }

    async fn delete(&self) -> StoreResult<bool> {
        Ok(self.geofence.write().expect("geofence poisoned").take().is_some())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn has_present(&self, employee_id: u64, date: NaiveDate) -> StoreResult<bool> {
        Ok(self
            .attendance
            .read()
            .expect("attendance poisoned")
            .iter()
            .any(|r| {
                r.employee_id == employee_id
                    && r.attendance_date == date
                    && r.status == AttendanceStatus::Present
            }))
    }

    async fn insert(&self, new: NewAttendance) -> StoreResult<AttendanceRecord> {
        let mut rows = self.attendance.write().expect("attendance poisoned");
        let taken = rows.iter().any(|r| {
            r.employee_id == new.employee_id
                && r.attendance_date == new.attendance_date
                && r.status == AttendanceStatus::Present
        });
        if taken {
            return Err(StoreError::Conflict);
        }

        let record = AttendanceRecord {
            attendance_id: rows.len() as u64 + 1,
            employee_id: new.employee_id,
            attendance_date: new.attendance_date,
            time_in: new.time_in,
            status: AttendanceStatus::Present,
            recorded_coordinate: new.coordinate,
            created_at: Utc::now(),
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn list_for_employee(&self, employee_id: u64) -> StoreResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .attendance
            .read()
            .expect("attendance poisoned")
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        attendance_order(&mut records);
        Ok(records)
    }

    async fn list_all(&self) -> StoreResult<Vec<AttendanceEntry>> {
        let mut records = self.attendance.read().expect("attendance poisoned").clone();
        attendance_order(&mut records);
        Ok(records
            .into_iter()
            .map(|record| AttendanceEntry {
                employee_name: self.employee_name(record.employee_id),
                record,
            })
            .collect())
    }
}

impl MemoryStore {
    fn leave_entries(&self, newest_first: bool, pending_only: bool) -> Vec<LeaveEntry> {
        let mut requests: Vec<_> = self
            .leaves
            .read()
            .expect("leave requests poisoned")
            .iter()
            .filter(|l| !pending_only || l.status == LeaveStatus::Pending)
            .cloned()
            .collect();
        requests.sort_by_key(|l| (l.applied_at, l.leave_id));
        if newest_first {
            requests.reverse();
        }
        requests
            .into_iter()
            .map(|request| LeaveEntry {
                employee_name: self.employee_name(request.employee_id),
                request,
            })
            .collect()
    }
}

#[async_trait]
impl LeaveStore for MemoryStore {
    async fn insert(&self, new: NewLeave) -> StoreResult<LeaveRequest> {
        let mut rows = self.leaves.write().expect("leave requests poisoned");
        let request = LeaveRequest {
            leave_id: rows.len() as u64 + 1,
            employee_id: new.employee_id,
            from_date: new.from_date,
            to_date: new.to_date,
            return_date: new.return_date,
            num_days: new.num_days,
            reason: new.reason,
            status: LeaveStatus::Pending,
            applied_at: Utc::now(),
            reviewed_by: None,
            reviewed_at: None,
            hr_comments: None,
        };
        rows.push(request.clone());
        Ok(request)
    }

    async fn decide_pending(
        &self,
        leave_id: u64,
        decision: LeaveDecision,
    ) -> StoreResult<Option<LeaveRequest>> {
        let mut rows = self.leaves.write().expect("leave requests poisoned");
        let Some(request) = rows
            .iter_mut()
            .find(|l| l.leave_id == leave_id && l.status == LeaveStatus::Pending)
        else {
            return Ok(None);
        };

        request.status = decision.status;
        request.reviewed_by = Some(decision.reviewed_by);
        request.reviewed_at = Some(decision.reviewed_at);
        request.hr_comments = decision.hr_comments;
        Ok(Some(request.clone()))
    }

    async fn list_for_employee(&self, employee_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        Ok(self
            .leave_entries(true, false)
            .into_iter()
            .map(|e| e.request)
            .filter(|l| l.employee_id == employee_id)
            .collect())
    }

    async fn list_pending(&self) -> StoreResult<Vec<LeaveEntry>> {
        Ok(self.leave_entries(false, true))
    }

    async fn list_all(&self) -> StoreResult<Vec<LeaveEntry>> {
        Ok(self.leave_entries(true, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::coordinate::Coordinate;
    use chrono::NaiveTime;

    fn check_in(employee_id: u64, day: u32, hour: u32) -> NewAttendance {
        NewAttendance {
            employee_id,
            attendance_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            time_in: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            coordinate: Coordinate::new(1.0, 2.0),
        }
    }

    #[actix_web::test]
    async fn second_present_row_for_same_day_conflicts() {
        let store = MemoryStore::new();
        AttendanceStore::insert(&store, check_in(1, 2, 9)).await.unwrap();

        let err = AttendanceStore::insert(&store, check_in(1, 2, 10)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        // other employee, same day
        AttendanceStore::insert(&store, check_in(2, 2, 9)).await.unwrap();
        assert_eq!(AttendanceStore::list_all(&store).await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn attendance_is_listed_newest_day_first() {
        let store = MemoryStore::new();
        store.register_employee(1, "Ada Lovelace");
        for day in [3, 5, 4] {
            AttendanceStore::insert(&store, check_in(1, day, 9)).await.unwrap();
        }

        let mine = AttendanceStore::list_for_employee(&store, 1).await.unwrap();
        let days: Vec<u32> = mine.iter().map(|r| chrono::Datelike::day(&r.attendance_date)).collect();
        assert_eq!(days, vec![5, 4, 3]);

        let all = AttendanceStore::list_all(&store).await.unwrap();
        assert_eq!(all[0].employee_name.as_deref(), Some("Ada Lovelace"));
    }

    #[actix_web::test]
    async fn geofence_upsert_replaces_in_place() {
        let store = MemoryStore::new();
        let draft = |name: &str, radius| GeofenceDraft {
            location_name: name.to_string(),
            center: Coordinate::new(12.9716, 77.5946),
            radius_meters: radius,
            set_by: 9,
        };

        assert!(store.upsert(draft("HQ", 100)).await.unwrap().created);
        let replaced = store.upsert(draft("Annex", 250)).await.unwrap();
        assert!(!replaced.created);

        let current = store.get().await.unwrap().unwrap();
        assert_eq!(current.location_name, "Annex");
        assert_eq!(current.radius_meters, 250);

        assert!(store.delete().await.unwrap());
        assert!(!store.delete().await.unwrap());
        assert!(store.get().await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn rewriting_identical_zone_is_not_a_create() {
        let store = MemoryStore::new();
        let draft = || GeofenceDraft {
            location_name: "HQ".to_string(),
            center: Coordinate::new(12.9716, 77.5946),
            radius_meters: 100,
            set_by: 9,
        };

        assert!(store.upsert(draft()).await.unwrap().created);
        let again = store.upsert(draft()).await.unwrap();
        assert!(!again.created);
        assert_eq!(again.config.radius_meters, 100);
    }
}
