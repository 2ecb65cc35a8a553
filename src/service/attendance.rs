use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use super::geo;
use crate::error::ServiceError;
use crate::model::{
    attendance::{AttendanceEntry, AttendanceRecord, NewAttendance},
    coordinate::Coordinate,
};
use crate::store::{AttendanceStore, GeofenceStore, StoreError};

/// Day-level presence ledger. The only write is a geofenced check-in;
/// a day without a record counts as absent.
pub struct AttendanceLedger {
    attendance: Arc<dyn AttendanceStore>,
    geofence: Arc<dyn GeofenceStore>,
}

impl AttendanceLedger {
    pub fn new(attendance: Arc<dyn AttendanceStore>, geofence: Arc<dyn GeofenceStore>) -> Self {
        Self {
            attendance,
            geofence,
        }
    }

    /// Marks `employee_id` present for the calendar day of `now` (server-local wall clock).
    pub async fn check_in(
        &self,
        employee_id: u64,
        coordinate: Coordinate,
        now: NaiveDateTime,
    ) -> Result<AttendanceRecord, ServiceError> {
        if !coordinate.is_valid() {
            return Err(ServiceError::validation(
                "Current location (latitude and longitude) is required to mark attendance.",
            ));
        }

        let today = now.date();
        if self.attendance.has_present(employee_id, today).await? {
            return Err(ServiceError::AlreadyMarked);
        }

        match self.geofence.get().await? {
            None => {
                warn!(
                    employee_id,
                    "Company attendance location is not set by HR. Proceeding without geofence check."
                );
            }
            Some(zone) => {
                let distance = geo::distance(zone.center, coordinate);
                if !zone.admits(distance) {
                    info!(employee_id, distance, radius = zone.radius_meters, "Check-in outside zone");
                    return Err(ServiceError::OutOfZone {
                        distance,
                        location_name: zone.location_name,
                    });
                }
            }
        }

        let record = self
            .attendance
            .insert(NewAttendance {
                employee_id,
                attendance_date: today,
                time_in: now.time(),
                coordinate,
            })
            .await
            .map_err(|e| match e {
                // lost a race with a concurrent check-in for the same day
                StoreError::Conflict => ServiceError::AlreadyMarked,
                other => other.into(),
            })?;

        info!(employee_id, attendance_id = record.attendance_id, "Marked present");
        Ok(record)
    }

    pub async fn list_for_employee(
        &self,
        employee_id: u64,
    ) -> Result<Vec<AttendanceRecord>, ServiceError> {
        Ok(self.attendance.list_for_employee(employee_id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<AttendanceEntry>, ServiceError> {
        Ok(self.attendance.list_all().await?)
    }
}
