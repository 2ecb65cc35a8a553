use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::coordinate::Coordinate;

/// The single company-wide attendance zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "location_name": "HQ",
    "center": { "latitude": 12.9716, "longitude": 77.5946 },
    "radius_meters": 100,
    "set_by": 7,
    "set_at": "2026-01-01T09:00:00Z"
}))]
pub struct GeofenceConfig {
    pub location_name: String,
    pub center: Coordinate,
    pub radius_meters: u32,
    /// user id of the HR account that last wrote the zone
    pub set_by: u64,
    #[schema(value_type = String, format = "date-time")]
    pub set_at: DateTime<Utc>,
}

impl GeofenceConfig {
    /// Boundary is inclusive.
    pub fn admits(&self, distance_meters: f64) -> bool {
        distance_meters <= f64::from(self.radius_meters)
    }
}

/// Validated input for an upsert.
#[derive(Debug, Clone)]
pub struct GeofenceDraft {
    pub location_name: String,
    pub center: Coordinate,
    pub radius_meters: u32,
    pub set_by: u64,
}
