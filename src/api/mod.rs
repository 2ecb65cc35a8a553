pub mod attendance;
pub mod geofence;
pub mod leave_request;
