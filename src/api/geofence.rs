use crate::auth::auth::AuthUser;
use crate::error::ServiceError;
use crate::model::coordinate::Coordinate;
use crate::service::GeofenceService;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SetGeofence {
    #[schema(example = "HQ")]
    pub location_name: Option<String>,
    #[schema(example = 12.971600)]
    pub latitude: Option<f64>,
    #[schema(example = 77.594600)]
    pub longitude: Option<f64>,
    #[schema(example = 100)]
    pub radius_meters: Option<i64>,
}

/// Current company attendance location
#[utoipa::path(
    get,
    path = "/api/geo-locations",
    responses(
        (status = 200, description = "The attendance zone", body = crate::model::geofence::GeofenceConfig),
        (status = 404, description = "No zone configured", body = Object, example = json!({
            "message": "No global attendance location set yet."
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Geofence"
)]
pub async fn get_geofence(
    _auth: AuthUser,
    geofence: web::Data<GeofenceService>,
) -> actix_web::Result<impl Responder> {
    match geofence.get().await? {
        Some(config) => Ok(HttpResponse::Ok().json(config)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No global attendance location set yet."
        }))),
    }
}

/// Set or replace the company attendance location (HR)
#[utoipa::path(
    post,
    path = "/api/geo-locations",
    request_body = SetGeofence,
    responses(
        (status = 201, description = "Zone created", body = crate::model::geofence::GeofenceConfig),
        (status = 200, description = "Existing zone replaced", body = crate::model::geofence::GeofenceConfig),
        (status = 400, description = "Invalid zone"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Geofence"
)]
pub async fn set_geofence(
    auth: AuthUser,
    geofence: web::Data<GeofenceService>,
    payload: web::Json<SetGeofence>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    let SetGeofence {
        location_name: Some(location_name),
        latitude: Some(latitude),
        longitude: Some(longitude),
        radius_meters: Some(radius_meters),
    } = payload.into_inner()
    else {
        return Err(ServiceError::validation(
            "Please provide location name, latitude, longitude, and radius.",
        )
        .into());
    };

    let upserted = geofence
        .upsert(
            &location_name,
            Coordinate::new(latitude, longitude),
            radius_meters,
            auth.user_id,
        )
        .await?;

    if upserted.created {
        Ok(HttpResponse::Created().json(upserted.config))
    } else {
        Ok(HttpResponse::Ok().json(upserted.config))
    }
}

/// Remove the company attendance location (HR)
#[utoipa::path(
    delete,
    path = "/api/geo-locations",
    responses(
        (status = 200, description = "Zone removed", body = Object, example = json!({
            "message": "Global attendance location deleted successfully."
        })),
        (status = 404, description = "Nothing to remove"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Geofence"
)]
pub async fn delete_geofence(
    auth: AuthUser,
    geofence: web::Data<GeofenceService>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    if geofence.delete().await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Global attendance location deleted successfully."
        })))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "No global attendance location found to delete."
        })))
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::jwt::test_tokens;
    use crate::test_support::{TestApp, bearer};
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn zone_lifecycle() {
        let app = TestApp::new();
        let svc = test::init_service(app.build()).await;
        let hr = test_tokens::hr(4);
        let emp = test_tokens::employee(7, 1000);

        let get = |token: &str| {
            app.request(test::TestRequest::get().uri("/api/geo-locations"))
                .insert_header(bearer(token))
                .to_request()
        };
        let set = |radius: i64| {
            app.request(test::TestRequest::post().uri("/api/geo-locations"))
                .insert_header(bearer(&hr))
                .set_json(json!({"location_name": "HQ", "latitude": 12.9716, "longitude": 77.5946, "radius_meters": radius}))
                .to_request()
        };

        assert_eq!(test::call_service(&svc, get(&emp)).await.status(), StatusCode::NOT_FOUND);

        assert_eq!(test::call_service(&svc, set(100)).await.status(), StatusCode::CREATED);
        // same values again is still a replacement
        assert_eq!(test::call_service(&svc, set(100)).await.status(), StatusCode::OK);
        assert_eq!(test::call_service(&svc, set(250)).await.status(), StatusCode::OK);
        assert_eq!(test::call_service(&svc, set(0)).await.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(&svc, get(&emp)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let zone: Value = test::read_body_json(resp).await;
        assert_eq!(zone["radius_meters"], 250);
        assert_eq!(zone["set_by"], 4);
        assert_eq!(zone["center"]["latitude"], 12.9716);

        let delete = || {
            app.request(test::TestRequest::delete().uri("/api/geo-locations"))
                .insert_header(bearer(&hr))
                .to_request()
        };
        assert_eq!(test::call_service(&svc, delete()).await.status(), StatusCode::OK);
        assert_eq!(test::call_service(&svc, delete()).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::call_service(&svc, get(&emp)).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn employees_cannot_change_the_zone() {
        let app = TestApp::new();
        let svc = test::init_service(app.build()).await;

        let req = app
            .request(test::TestRequest::post().uri("/api/geo-locations"))
            .insert_header(bearer(&test_tokens::employee(7, 1000)))
            .set_json(json!({"location_name": "Home", "latitude": 1.0, "longitude": 1.0, "radius_meters": 100000}))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::FORBIDDEN);

        let req = app
            .request(test::TestRequest::post().uri("/api/geo-locations"))
            .insert_header(bearer(&test_tokens::hr(4)))
            .set_json(json!({"latitude": 1.0, "longitude": 1.0}))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
