use std::sync::Arc;

use actix_web::web::Data;

use crate::service::{AttendanceLedger, DayCountPolicy, GeofenceService, LeaveWorkflow};
use crate::store::{AttendanceStore, GeofenceStore, LeaveStore};

/// Shared handler state, cloned into every worker.
#[derive(Clone)]
pub struct AppServices {
    pub attendance: Data<AttendanceLedger>,
    pub geofence: Data<GeofenceService>,
    pub leaves: Data<LeaveWorkflow>,
}

impl AppServices {
    pub fn new<S>(store: Arc<S>, policy: DayCountPolicy) -> Self
    where
        S: AttendanceStore + GeofenceStore + LeaveStore + 'static,
    {
        Self {
            attendance: Data::new(AttendanceLedger::new(store.clone(), store.clone())),
            geofence: Data::new(GeofenceService::new(store.clone())),
            leaves: Data::new(LeaveWorkflow::new(store, policy)),
        }
    }
}
