//! Persistence ports used by the services, plus the MySQL and in-memory backends.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;

use crate::model::{
    attendance::{AttendanceEntry, AttendanceRecord, NewAttendance},
    geofence::{GeofenceConfig, GeofenceDraft},
    leave_request::{LeaveDecision, LeaveEntry, LeaveRequest, NewLeave},
};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// MySQL SQLSTATE for integrity constraint violations.
const SQLSTATE_INTEGRITY: &str = "23000";

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "unique constraint violated")]
    Conflict,
    #[display(fmt = "{}", _0)]
    Backend(anyhow::Error),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some(SQLSTATE_INTEGRITY) {
                return StoreError::Conflict;
            }
        }
        StoreError::Backend(e.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of writing the global zone.
#[derive(Debug, Clone)]
pub struct Upserted {
    pub config: GeofenceConfig,
    /// false when an existing record was replaced
    pub created: bool,
}

#[async_trait]
pub trait GeofenceStore: Send + Sync {
    async fn get(&self) -> StoreResult<Option<GeofenceConfig>>;

    /// Insert the zone, or replace every field of the existing one.
    async fn upsert(&self, draft: GeofenceDraft) -> StoreResult<Upserted>;

    /// Returns false when there was nothing to remove.
    async fn delete(&self) -> StoreResult<bool>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn has_present(&self, employee_id: u64, date: NaiveDate) -> StoreResult<bool>;

    /// Fails with [`StoreError::Conflict`] when a Present row already exists for the day.
    async fn insert(&self, new: NewAttendance) -> StoreResult<AttendanceRecord>;

    /// Newest date first, then newest time_in.
    async fn list_for_employee(&self, employee_id: u64) -> StoreResult<Vec<AttendanceRecord>>;

    async fn list_all(&self) -> StoreResult<Vec<AttendanceEntry>>;
}

#[async_trait]
pub trait LeaveStore: Send + Sync {
    async fn insert(&self, new: NewLeave) -> StoreResult<LeaveRequest>;

    /// Applies the decision only if the request is still Pending.
    /// `None` covers both an unknown id and a request already reviewed.
    async fn decide_pending(
        &self,
        leave_id: u64,
        decision: LeaveDecision,
    ) -> StoreResult<Option<LeaveRequest>>;

    async fn list_for_employee(&self, employee_id: u64) -> StoreResult<Vec<LeaveRequest>>;

    /// Oldest application first.
    async fn list_pending(&self) -> StoreResult<Vec<LeaveEntry>>;

    async fn list_all(&self) -> StoreResult<Vec<LeaveEntry>>;
}
