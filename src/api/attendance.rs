use crate::auth::auth::AuthUser;
use crate::error::ServiceError;
use crate::model::coordinate::Coordinate;
use crate::service::AttendanceLedger;
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct MarkPresent {
    #[schema(example = 12.971600)]
    pub latitude: Option<f64>,
    #[schema(example = 77.594600)]
    pub longitude: Option<f64>,
}

/// Employee marks themselves present for today
#[utoipa::path(
    post,
    path = "/api/attendance/mark-present",
    request_body = MarkPresent,
    responses(
        (status = 201, description = "Attendance marked as Present for today", body = crate::model::attendance::AttendanceRecord),
        (status = 400, description = "Already marked today, outside the zone, or missing location", body = Object, example = json!({
            "message": "You are outside the allowed attendance zone (HQ). Distance: 512.40m",
            "distance": 512.4,
            "location_name": "HQ"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_present(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    payload: web::Json<MarkPresent>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;

    let (Some(latitude), Some(longitude)) = (payload.latitude, payload.longitude) else {
        return Err(ServiceError::validation(
            "Current location (latitude and longitude) is required to mark attendance.",
        )
        .into());
    };

    // attendance day follows the server's local calendar
    let now = Local::now().naive_local();
    let record = ledger
        .check_in(employee_id, Coordinate::new(latitude, longitude), now)
        .await?;

    Ok(HttpResponse::Created().json(record))
}

/// Attendance history of the calling employee
#[utoipa::path(
    get,
    path = "/api/attendance/my-attendance",
    responses(
        (status = 200, description = "Newest day first", body = [crate::model::attendance::AttendanceRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_attendance(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let records = ledger.list_for_employee(employee_id).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Attendance of every employee (HR)
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Newest day first, with employee names", body = [crate::model::attendance::AttendanceEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;
    let entries = ledger.list_all().await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[cfg(test)]
mod tests {
    use crate::auth::jwt::test_tokens;
    use crate::test_support::{TestApp, bearer};
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn check_in_flow_over_http() {
        let app = TestApp::new();
        app.store.register_employee(1000, "John Doe");
        let svc = test::init_service(app.build()).await;
        let hr = test_tokens::hr(1);
        let emp = test_tokens::employee(7, 1000);

        let req = app
            .request(test::TestRequest::post().uri("/api/geo-locations"))
            .insert_header(bearer(&hr))
            .set_json(json!({"location_name": "HQ", "latitude": 12.9716, "longitude": 77.5946, "radius_meters": 100}))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::CREATED);

        let mark = || {
            app.request(test::TestRequest::post().uri("/api/attendance/mark-present"))
                .insert_header(bearer(&emp))
                .set_json(json!({"latitude": 12.9716, "longitude": 77.5946}))
                .to_request()
        };
        let resp = test::call_service(&svc, mark()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let record: Value = test::read_body_json(resp).await;
        assert_eq!(record["status"], "Present");
        assert_eq!(record["employee_id"], 1000);

        let resp = test::call_service(&svc, mark()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "You have already marked yourself present for today.");

        let req = app
            .request(test::TestRequest::get().uri("/api/attendance"))
            .insert_header(bearer(&hr))
            .to_request();
        let all: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(all.as_array().unwrap().len(), 1);
        assert_eq!(all[0]["employee_name"], "John Doe");
        assert_eq!(all[0]["attendance_id"], record["attendance_id"]);
    }

    #[actix_web::test]
    async fn out_of_zone_reports_distance_and_location() {
        let app = TestApp::new();
        let svc = test::init_service(app.build()).await;

        let req = app
            .request(test::TestRequest::post().uri("/api/geo-locations"))
            .insert_header(bearer(&test_tokens::hr(1)))
            .set_json(json!({"location_name": "HQ", "latitude": 12.9716, "longitude": 77.5946, "radius_meters": 100}))
            .to_request();
        test::call_service(&svc, req).await;

        let req = app
            .request(test::TestRequest::post().uri("/api/attendance/mark-present"))
            .insert_header(bearer(&test_tokens::employee(8, 2000)))
            .set_json(json!({"latitude": 12.976097, "longitude": 77.5946}))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["location_name"], "HQ");
        let distance = body["distance"].as_f64().unwrap();
        assert!((distance - 500.0).abs() < 1.0, "distance {distance}");
    }

    #[actix_web::test]
    async fn missing_location_is_rejected() {
        let app = TestApp::new();
        let svc = test::init_service(app.build()).await;

        let req = app
            .request(test::TestRequest::post().uri("/api/attendance/mark-present"))
            .insert_header(bearer(&test_tokens::employee(8, 2000)))
            .set_json(json!({"latitude": 12.9716}))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn roles_are_enforced() {
        let app = TestApp::new();
        let svc = test::init_service(app.build()).await;

        // HR cannot check in, employees cannot see everyone
        let req = app
            .request(test::TestRequest::post().uri("/api/attendance/mark-present"))
            .insert_header(bearer(&test_tokens::hr(1)))
            .set_json(json!({"latitude": 1.0, "longitude": 1.0}))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::FORBIDDEN);

        let req = app
            .request(test::TestRequest::get().uri("/api/attendance"))
            .insert_header(bearer(&test_tokens::employee(8, 2000)))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::FORBIDDEN);

        let req = app
            .request(test::TestRequest::get().uri("/api/attendance/my-attendance"))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
