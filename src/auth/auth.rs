use crate::{error::ServiceError, model::role::Role};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Authenticated principal, placed in request extensions by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ServiceError::Unauthorized("Missing token".to_string()).into()),
        )
    }
}

impl AuthUser {
    pub fn require_hr(&self) -> Result<(), ServiceError> {
        if self.role == Role::Hr {
            Ok(())
        } else {
            Err(role_denied())
        }
    }

    /// Returns the linked employee id of an Employee-role caller.
    pub fn require_employee(&self) -> Result<u64, ServiceError> {
        if self.role != Role::Employee {
            return Err(role_denied());
        }
        self.employee_id
            .ok_or_else(|| ServiceError::Forbidden("No employee profile".to_string()))
    }
}

fn role_denied() -> ServiceError {
    ServiceError::Forbidden("Access denied: You do not have the required role.".to_string())
}
