use crate::{
    api::{attendance, geofence, leave_request},
    auth::middleware::auth_middleware,
    config::Config,
    error::ServiceError,
    state::AppServices,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

// Helper to build per-scope limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("per_millisecond and burst_size are both non-zero");
    Governor::new(&cfg)
}

/// Malformed bodies (bad `YYYY-MM-DD`, wrong types) surface as validation errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ServiceError::validation(format!("Invalid request body: {err}")).into()
    })
}

/// The only path parameter is a leave id; one that does not parse cannot name a pending request.
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| ServiceError::NotFoundOrAlreadyReviewed.into())
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config, services: AppServices) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(services.attendance)
        .app_data(services.geofence)
        .app_data(services.leaves);

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(build_limiter(config.rate_protected_per_min)) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    // /attendance/mark-present
                    .service(
                        web::resource("/mark-present")
                            .route(web::post().to(attendance::mark_present)),
                    )
                    // /attendance/my-attendance
                    .service(
                        web::resource("/my-attendance")
                            .route(web::get().to(attendance::my_attendance)),
                    ),
            )
            .service(
                web::scope("/geo-locations").service(
                    // /geo-locations
                    web::resource("")
                        .route(web::get().to(geofence::get_geofence))
                        .route(web::post().to(geofence::set_geofence))
                        .route(web::delete().to(geofence::delete_geofence)),
                ),
            )
            .service(
                web::scope("/leaves")
                    // /leaves
                    .service(web::resource("").route(web::get().to(leave_request::leave_list)))
                    // /leaves/apply
                    .service(
                        web::resource("/apply").route(web::post().to(leave_request::apply_leave)),
                    )
                    // /leaves/my-applications
                    .service(
                        web::resource("/my-applications")
                            .route(web::get().to(leave_request::my_applications)),
                    )
                    // /leaves/pending
                    .service(
                        web::resource("/pending")
                            .route(web::get().to(leave_request::pending_leaves)),
                    )
                    // /leaves/{id}/status
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(leave_request::decide_leave)),
                    ),
            ),
    );
}

// API REQUEST
//  └─ Authorization: Bearer access_token (issued by the credential store)
//       ├─ role HR       → geo-locations writes, attendance + leave review
//       └─ role Employee → mark-present, my-attendance, leave apply/my-applications
