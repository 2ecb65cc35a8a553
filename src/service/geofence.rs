use std::sync::Arc;

use tracing::info;

use crate::error::ServiceError;
use crate::model::{
    coordinate::Coordinate,
    geofence::{GeofenceConfig, GeofenceDraft},
};
use crate::store::{GeofenceStore, Upserted};

/// Reads and writes the single company-wide attendance zone.
pub struct GeofenceService {
    store: Arc<dyn GeofenceStore>,
}

impl GeofenceService {
    pub fn new(store: Arc<dyn GeofenceStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self) -> Result<Option<GeofenceConfig>, ServiceError> {
        Ok(self.store.get().await?)
    }

    pub async fn upsert(
        &self,
        location_name: &str,
        center: Coordinate,
        radius_meters: i64,
        actor: u64,
    ) -> Result<Upserted, ServiceError> {
        let location_name = location_name.trim();
        if location_name.is_empty() {
            return Err(ServiceError::validation("Location name must not be empty."));
        }
        if !center.is_valid() {
            return Err(ServiceError::validation(
                "Latitude must be within [-90, 90] and longitude within [-180, 180].",
            ));
        }
        let radius_meters = u32::try_from(radius_meters)
            .ok()
            .filter(|r| *r > 0)
            .ok_or_else(|| ServiceError::validation("Radius must be a positive number of meters."))?;

        let upserted = self
            .store
            .upsert(GeofenceDraft {
                location_name: location_name.to_string(),
                center,
                radius_meters,
                set_by: actor,
            })
            .await?;

        info!(
            location_name,
            radius_meters,
            set_by = actor,
            created = upserted.created,
            "Attendance zone saved"
        );
        Ok(upserted)
    }

    pub async fn delete(&self) -> Result<bool, ServiceError> {
        let removed = self.store.delete().await?;
        if removed {
            info!("Attendance zone removed; check-ins are no longer constrained");
        }
        Ok(removed)
    }
}
