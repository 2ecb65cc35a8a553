//! Domain logic: geodesic distance, the attendance zone, the check-in
//! ledger and the leave approval workflow.

pub mod attendance;
pub mod geo;
pub mod geofence;
pub mod leave;

pub use attendance::AttendanceLedger;
pub use geofence::GeofenceService;
pub use leave::{DayCountPolicy, LeaveWorkflow};
