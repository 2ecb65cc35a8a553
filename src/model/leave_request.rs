use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, AsRefStr, EnumString, ToSchema)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Declined,
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub leave_id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = "2026-01-08", format = "date", value_type = String)]
    pub return_date: NaiveDate,
    #[schema(example = 3)]
    pub num_days: u32,
    #[schema(example = "Family event")]
    pub reason: String,
    pub status: LeaveStatus,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub applied_at: DateTime<Utc>,
    #[schema(nullable = true)]
    pub reviewed_by: Option<u64>,
    #[schema(format = "date-time", value_type = Option<String>, nullable = true)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[schema(nullable = true)]
    pub hr_comments: Option<String>,
}

/// Leave request joined with the applicant's display name, for HR views.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveEntry {
    #[serde(flatten)]
    pub request: LeaveRequest,
    #[schema(example = "John Doe", nullable = true)]
    pub employee_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLeave {
    pub employee_id: u64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub return_date: NaiveDate,
    pub num_days: u32,
    pub reason: String,
}

/// HR verdict applied to a pending request.
#[derive(Debug, Clone)]
pub struct LeaveDecision {
    pub status: LeaveStatus,
    pub hr_comments: Option<String>,
    pub reviewed_by: u64,
    pub reviewed_at: DateTime<Utc>,
}
