use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_access_token;
use crate::config::Config;
use crate::error::ServiceError;
use crate::model::role::Role;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

/// Short-circuits with a 401 carrying the usual `{message}` body.
fn reject(req: ServiceRequest, message: &str) -> ServiceResponse<BoxBody> {
    req.into_response(ServiceError::Unauthorized(message.to_string()).error_response())
}

/// Resolves the bearer token into an `AuthUser` stored in request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let secret = match req.app_data::<Data<Config>>() {
        Some(config) => config.jwt_secret.clone(),
        None => return Err(actix_web::error::ErrorInternalServerError("App config missing")),
    };

    let token = match req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .map(|h| h.to_str())
    {
        None => return Ok(reject(req, "Missing Authorization header")),
        Some(Err(_)) => return Ok(reject(req, "Invalid Authorization header encoding")),
        Some(Ok(value)) => match value.strip_prefix("Bearer ") {
            Some(token) => token.to_string(),
            None => return Ok(reject(req, "Authorization header must start with Bearer")),
        },
    };

    let claims = match verify_access_token(&token, &secret) {
        Ok(claims) => claims,
        Err(reason) => {
            tracing::debug!(%reason, path = %req.path(), "Rejected bearer token");
            return Ok(reject(req, "Invalid or expired token"));
        }
    };

    let Some(role) = Role::from_id(claims.role) else {
        tracing::debug!(user_id = claims.user_id, role = claims.role, "Unknown role id");
        return Ok(reject(req, "Invalid role"));
    };

    let auth_user = AuthUser {
        user_id: claims.user_id,
        username: claims.sub,
        role,
        employee_id: claims.employee_id,
    };
    tracing::debug!(
        user_id = auth_user.user_id,
        username = %auth_user.username,
        role = %auth_user.role,
        "Authenticated request"
    );

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}

#[cfg(test)]
mod tests {
    use crate::auth::jwt::test_tokens;
    use crate::test_support::{TestApp, bearer};
    use actix_web::{
        http::{StatusCode, header},
        test,
    };
    use serde_json::Value;

    #[actix_web::test]
    async fn rejections_use_message_bodies() {
        let app = TestApp::new();
        let svc = test::init_service(app.build()).await;

        let missing = app
            .request(test::TestRequest::get().uri("/api/attendance/my-attendance"))
            .to_request();
        let wrong_scheme = app
            .request(test::TestRequest::get().uri("/api/attendance/my-attendance"))
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_request();
        let malformed = app
            .request(test::TestRequest::get().uri("/api/attendance/my-attendance"))
            .insert_header(bearer("not.a.jwt"))
            .to_request();
        let bad_encoding = app
            .request(test::TestRequest::get().uri("/api/attendance/my-attendance"))
            .insert_header((
                header::AUTHORIZATION,
                header::HeaderValue::from_bytes(b"Bearer \xff").unwrap(),
            ))
            .to_request();
        let unknown_role = app
            .request(test::TestRequest::get().uri("/api/attendance/my-attendance"))
            .insert_header(bearer(&test_tokens::mint(
                7,
                9,
                Some(1000),
                crate::models::TokenType::Access,
            )))
            .to_request();

        for req in [missing, wrong_scheme, malformed, bad_encoding, unknown_role] {
            let resp = test::call_service(&svc, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                resp.headers().get(header::CONTENT_TYPE).unwrap(),
                "application/json"
            );
            let body: Value = test::read_body_json(resp).await;
            assert!(body["message"].is_string());
            assert!(body.get("details").is_none());
            assert!(body.get("error").is_none());
        }
    }
}
