pub mod attendance;
pub mod coordinate;
pub mod geofence;
pub mod leave_request;
pub mod role;
