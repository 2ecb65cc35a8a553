use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

use super::coordinate::Coordinate;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, AsRefStr, EnumString, ToSchema)]
pub enum AttendanceStatus {
    Present,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub attendance_id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub attendance_date: NaiveDate,
    #[schema(example = "09:01:12", value_type = String)]
    pub time_in: NaiveTime,
    pub status: AttendanceStatus,
    pub recorded_coordinate: Coordinate,
    #[schema(example = "2026-01-01T03:31:12Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Attendance row joined with the employee's display name, for HR views.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceEntry {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    #[schema(example = "John Doe", nullable = true)]
    pub employee_name: Option<String>,
}

/// A check-in that passed validation, ready to persist.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub attendance_date: NaiveDate,
    pub time_in: NaiveTime,
    pub coordinate: Coordinate,
}
