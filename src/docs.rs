use crate::api::attendance::MarkPresent;
use crate::api::geofence::SetGeofence;
use crate::api::leave_request::{ApplyLeave, LeaveDecisionBody};
use crate::model::attendance::{AttendanceEntry, AttendanceRecord, AttendanceStatus};
use crate::model::coordinate::Coordinate;
use crate::model::geofence::GeofenceConfig;
use crate::model::leave_request::{LeaveEntry, LeaveRequest, LeaveStatus};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Portal API",
        version = "1.0.0",
        description = r#"
## Human Resource Management (HRM) Portal

Attendance and leave services for an HRM portal.

### 🔹 Key Features
- **Geofenced Attendance**
  - Employees mark themselves present once per day, from inside the company zone
- **Attendance Zone**
  - HR sets, replaces or removes the single company-wide geofence
- **Leave Management**
  - Employees apply for leave; HR approves or declines each request exactly once

### 🔐 Security
Every endpoint expects a **JWT Bearer** access token issued by the credential store.
The token's role claim decides between **Employee** and **HR** operations.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::mark_present,
        crate::api::attendance::my_attendance,
        crate::api::attendance::list_attendance,

        crate::api::geofence::get_geofence,
        crate::api::geofence::set_geofence,
        crate::api::geofence::delete_geofence,

        crate::api::leave_request::apply_leave,
        crate::api::leave_request::my_applications,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::decide_leave
    ),
    components(
        schemas(
            Coordinate,
            MarkPresent,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceEntry,
            SetGeofence,
            GeofenceConfig,
            ApplyLeave,
            LeaveDecisionBody,
            LeaveStatus,
            LeaveRequest,
            LeaveEntry
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Geofenced check-in APIs"),
        (name = "Geofence", description = "Company attendance zone APIs"),
        (name = "Leave", description = "Leave management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
