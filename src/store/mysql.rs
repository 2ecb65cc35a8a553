use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{FromRow, MySqlPool};

use super::{AttendanceStore, GeofenceStore, LeaveStore, StoreError, StoreResult, Upserted};
use crate::model::{
    attendance::{AttendanceEntry, AttendanceRecord, AttendanceStatus, NewAttendance},
    coordinate::Coordinate,
    geofence::{GeofenceConfig, GeofenceDraft},
    leave_request::{LeaveDecision, LeaveEntry, LeaveRequest, LeaveStatus, NewLeave},
};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn parse_status<T: std::str::FromStr>(raw: &str) -> StoreResult<T> {
    raw.parse()
        .map_err(|_| StoreError::Backend(anyhow::anyhow!("unknown status value `{raw}`")))
}

/* =========================
Geofence
========================= */

#[derive(FromRow)]
struct GeofenceRow {
    location_name: String,
    latitude: f64,
    longitude: f64,
    radius_meters: u32,
    set_by: u64,
    set_at: DateTime<Utc>,
}

impl From<GeofenceRow> for GeofenceConfig {
    fn from(row: GeofenceRow) -> Self {
        GeofenceConfig {
            location_name: row.location_name,
            center: Coordinate::new(row.latitude, row.longitude),
            radius_meters: row.radius_meters,
            set_by: row.set_by,
            set_at: row.set_at,
        }
    }
}

#[async_trait]
impl GeofenceStore for MySqlStore {
    async fn get(&self) -> StoreResult<Option<GeofenceConfig>> {
        let row = sqlx::query_as::<_, GeofenceRow>(
            r#"
            SELECT location_name, latitude, longitude, radius_meters, set_by, set_at
            FROM geo_locations
            WHERE singleton = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn upsert(&self, draft: GeofenceDraft) -> StoreResult<Upserted> {
        let mut tx = self.pool.begin().await?;

        // Locks the slot (or its gap) so `created` reflects what this writer replaced.
        let existed = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM geo_locations WHERE singleton = 1 FOR UPDATE",
        )
        .fetch_one(&mut *tx)
        .await?
            > 0;

        // The primary key is pinned to 1, so this statement is the whole upsert.
        sqlx::query(
            r#"
            INSERT INTO geo_locations
                (singleton, location_name, latitude, longitude, radius_meters, set_by, set_at)
            VALUES (1, ?, ?, ?, ?, ?, UTC_TIMESTAMP())
            ON DUPLICATE KEY UPDATE
                location_name = VALUES(location_name),
                latitude = VALUES(latitude),
                longitude = VALUES(longitude),
                radius_meters = VALUES(radius_meters),
                set_by = VALUES(set_by),
                set_at = VALUES(set_at)
            "#,
        )
        .bind(&draft.location_name)
        .bind(draft.center.latitude)
        .bind(draft.center.longitude)
        .bind(draft.radius_meters)
        .bind(draft.set_by)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, GeofenceRow>(
            r#"
            SELECT location_name, latitude, longitude, radius_meters, set_by, set_at
            FROM geo_locations
            WHERE singleton = 1
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Upserted {
            config: row.into(),
            created: !existed,
        })
    }

    async fn delete(&self) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM geo_locations WHERE singleton = 1")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/* =========================
Attendance
========================= */

#[derive(FromRow)]
struct AttendanceRow {
    attendance_id: u64,
    employee_id: u64,
    attendance_date: NaiveDate,
    time_in: NaiveTime,
    status: String,
    recorded_latitude: f64,
    recorded_longitude: f64,
    created_at: DateTime<Utc>,
    #[sqlx(default)]
    employee_name: Option<String>,
}

impl AttendanceRow {
    fn into_record(self) -> StoreResult<(AttendanceRecord, Option<String>)> {
        let record = AttendanceRecord {
            attendance_id: self.attendance_id,
            employee_id: self.employee_id,
            attendance_date: self.attendance_date,
            time_in: self.time_in,
            status: parse_status(&self.status)?,
            recorded_coordinate: Coordinate::new(self.recorded_latitude, self.recorded_longitude),
            created_at: self.created_at,
        };
        Ok((record, self.employee_name))
    }
}

const ATTENDANCE_COLUMNS: &str = r#"
    a.attendance_id, a.employee_id, a.attendance_date, a.time_in, a.status,
    a.recorded_latitude, a.recorded_longitude, a.created_at
"#;

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn has_present(&self, employee_id: u64, date: NaiveDate) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM attendance
                WHERE employee_id = ? AND attendance_date = ? AND status = ?
            )
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(AttendanceStatus::Present.as_ref())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, new: NewAttendance) -> StoreResult<AttendanceRecord> {
        // A concurrent duplicate trips uq_attendance_day and surfaces as Conflict.
        let result = sqlx::query(
            r#"
            INSERT INTO attendance
                (employee_id, attendance_date, time_in, status, recorded_latitude, recorded_longitude)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.attendance_date)
        .bind(new.time_in)
        .bind(AttendanceStatus::Present.as_ref())
        .bind(new.coordinate.latitude)
        .bind(new.coordinate.longitude)
        .execute(&self.pool)
        .await?;

        let sql = format!(
            "SELECT {} FROM attendance a WHERE a.attendance_id = ?",
            ATTENDANCE_COLUMNS
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(result.last_insert_id())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into_record()?.0)
    }

    async fn list_for_employee(&self, employee_id: u64) -> StoreResult<Vec<AttendanceRecord>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM attendance a
            WHERE a.employee_id = ?
            ORDER BY a.attendance_date DESC, a.time_in DESC
            "#,
            ATTENDANCE_COLUMNS
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| row.into_record().map(|(record, _)| record))
            .collect()
    }

    async fn list_all(&self) -> StoreResult<Vec<AttendanceEntry>> {
        let sql = format!(
            r#"
            SELECT {}, CONCAT(e.first_name, ' ', e.last_name) AS employee_name
            FROM attendance a
            LEFT JOIN employees e ON e.id = a.employee_id
            ORDER BY a.attendance_date DESC, a.time_in DESC
            "#,
            ATTENDANCE_COLUMNS
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                row.into_record()
                    .map(|(record, employee_name)| AttendanceEntry {
                        record,
                        employee_name,
                    })
            })
            .collect()
    }
}

/* =========================
Leave requests
========================= */

#[derive(FromRow)]
struct LeaveRow {
    leave_id: u64,
    employee_id: u64,
    from_date: NaiveDate,
    to_date: NaiveDate,
    return_date: NaiveDate,
    num_days: u32,
    reason: String,
    status: String,
    applied_at: DateTime<Utc>,
    reviewed_by: Option<u64>,
    reviewed_at: Option<DateTime<Utc>>,
    hr_comments: Option<String>,
    #[sqlx(default)]
    employee_name: Option<String>,
}

impl LeaveRow {
    fn into_entry(self) -> StoreResult<LeaveEntry> {
        let request = LeaveRequest {
            leave_id: self.leave_id,
            employee_id: self.employee_id,
            from_date: self.from_date,
            to_date: self.to_date,
            return_date: self.return_date,
            num_days: self.num_days,
            reason: self.reason,
            status: parse_status::<LeaveStatus>(&self.status)?,
            applied_at: self.applied_at,
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at,
            hr_comments: self.hr_comments,
        };
        Ok(LeaveEntry {
            request,
            employee_name: self.employee_name,
        })
    }
}

const LEAVE_COLUMNS: &str = r#"
    l.leave_id, l.employee_id, l.from_date, l.to_date, l.return_date, l.num_days,
    l.reason, l.status, l.applied_at, l.reviewed_by, l.reviewed_at, l.hr_comments
"#;

impl MySqlStore {
    async fn fetch_leave(&self, leave_id: u64) -> StoreResult<Option<LeaveRequest>> {
        let sql = format!("SELECT {} FROM leave_requests l WHERE l.leave_id = ?", LEAVE_COLUMNS);
        let row = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(leave_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_entry().map(|e| e.request)).transpose()
    }

    async fn leave_entries(&self, pending_only: bool) -> StoreResult<Vec<LeaveEntry>> {
        // pending queue is served oldest-first
        let (filter, order) = if pending_only {
            ("WHERE l.status = ?", "ASC")
        } else {
            ("", "DESC")
        };
        let sql = format!(
            r#"
            SELECT {}, CONCAT(e.first_name, ' ', e.last_name) AS employee_name
            FROM leave_requests l
            LEFT JOIN employees e ON e.id = l.employee_id
            {}
            ORDER BY l.applied_at {order}, l.leave_id {order}
            "#,
            LEAVE_COLUMNS, filter
        );

        let mut query = sqlx::query_as::<_, LeaveRow>(&sql);
        if pending_only {
            query = query.bind(LeaveStatus::Pending.as_ref());
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.into_iter().map(LeaveRow::into_entry).collect()
    }
}

#[async_trait]
impl LeaveStore for MySqlStore {
    async fn insert(&self, new: NewLeave) -> StoreResult<LeaveRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, from_date, to_date, return_date, num_days, reason, status, applied_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, UTC_TIMESTAMP())
            "#,
        )
        .bind(new.employee_id)
        .bind(new.from_date)
        .bind(new.to_date)
        .bind(new.return_date)
        .bind(new.num_days)
        .bind(&new.reason)
        .bind(LeaveStatus::Pending.as_ref())
        .execute(&self.pool)
        .await?;

        self.fetch_leave(result.last_insert_id())
            .await?
            .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("leave row missing after insert")))
    }

    async fn decide_pending(
        &self,
        leave_id: u64,
        decision: LeaveDecision,
    ) -> StoreResult<Option<LeaveRequest>> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?,
                reviewed_by = ?,
                reviewed_at = ?,
                hr_comments = ?
            WHERE leave_id = ?
            AND status = ?
            "#,
        )
        .bind(decision.status.as_ref())
        .bind(decision.reviewed_by)
        .bind(decision.reviewed_at)
        .bind(decision.hr_comments.as_deref())
        .bind(leave_id)
        .bind(LeaveStatus::Pending.as_ref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch_leave(leave_id).await
    }

    async fn list_for_employee(&self, employee_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM leave_requests l
            WHERE l.employee_id = ?
            ORDER BY l.applied_at DESC, l.leave_id DESC
            "#,
            LEAVE_COLUMNS
        );
        let rows = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| row.into_entry().map(|e| e.request))
            .collect()
    }

    async fn list_pending(&self) -> StoreResult<Vec<LeaveEntry>> {
        self.leave_entries(true).await
    }

    async fn list_all(&self) -> StoreResult<Vec<LeaveEntry>> {
        self.leave_entries(false).await
    }
}
