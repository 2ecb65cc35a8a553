use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde::Serialize;

use crate::store::StoreError;

#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "You have already marked yourself present for today.")]
    AlreadyMarked,

    #[display(
        fmt = "You are outside the allowed attendance zone ({}). Distance: {:.2}m",
        location_name,
        distance
    )]
    OutOfZone { distance: f64, location_name: String },

    #[display(fmt = "Leave request not found or already reviewed")]
    NotFoundOrAlreadyReviewed,

    #[display(fmt = "{}", _0)]
    Unauthorized(String),

    #[display(fmt = "{}", _0)]
    Forbidden(String),

    #[display(fmt = "storage failure: {}", _0)]
    Storage(StoreError),
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Storage(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_name: Option<String>,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::AlreadyMarked
            | ServiceError::OutOfZone { .. }
            | ServiceError::NotFoundOrAlreadyReviewed => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // detail stays in the log, never in the response
            ServiceError::Storage(e) => {
                tracing::error!(error = %e, "Storage failure");
                ErrorBody {
                    message: "Internal Server Error".to_string(),
                    distance: None,
                    location_name: None,
                }
            }
            ServiceError::OutOfZone {
                distance,
                location_name,
            } => ErrorBody {
                message: self.to_string(),
                distance: Some((distance * 100.0).round() / 100.0),
                location_name: Some(location_name.clone()),
            },
            _ => ErrorBody {
                message: self.to_string(),
                distance: None,
                location_name: None,
            },
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn out_of_zone_body_names_location_and_distance() {
        let err = ServiceError::OutOfZone {
            distance: 500.123,
            location_name: "HQ".to_string(),
        };
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["location_name"], "HQ");
        assert_eq!(json["distance"], 500.12);
        assert_eq!(
            json["message"],
            "You are outside the allowed attendance zone (HQ). Distance: 500.12m"
        );
    }

    #[actix_web::test]
    async fn storage_failures_are_generic_500s() {
        let err = ServiceError::Storage(StoreError::Backend(anyhow::anyhow!("connection reset")));
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("connection reset"));
    }
}
