use crate::auth::auth::AuthUser;
use crate::error::ServiceError;
use crate::model::leave_request::LeaveStatus;
use crate::service::{LeaveWorkflow, leave::LeaveApplication};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub from_date: Option<chrono::NaiveDate>,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub to_date: Option<chrono::NaiveDate>,
    #[schema(example = "2026-01-08", format = "date", value_type = String)]
    pub return_date: Option<chrono::NaiveDate>,
    #[schema(example = "Family event")]
    pub reason: Option<String>,
    #[schema(example = 3)]
    pub num_days: Option<i64>,
}

#[derive(Deserialize, ToSchema)]
pub struct LeaveDecisionBody {
    #[schema(example = "Approved")]
    pub status: Option<String>,
    #[schema(example = "Enjoy your time off", nullable = true)]
    pub hr_comments: Option<String>,
}

/* =========================
Apply for leave (Employee)
========================= */
#[utoipa::path(
    post,
    path = "/api/leaves/apply",
    request_body(
        content = ApplyLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "Missing or inconsistent dates, reason or day count", body = Object, example = json!({
            "message": "Return date must be after the to date."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn apply_leave(
    auth: AuthUser,
    leaves: web::Data<LeaveWorkflow>,
    payload: web::Json<ApplyLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let payload = payload.into_inner();

    let request = leaves
        .submit(
            employee_id,
            LeaveApplication {
                from_date: payload.from_date,
                to_date: payload.to_date,
                return_date: payload.return_date,
                reason: payload.reason,
                num_days: payload.num_days,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(request))
}

/* =========================
Own applications (Employee)
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/my-applications",
    responses(
        (status = 200, description = "Newest application first", body = [crate::model::leave_request::LeaveRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn my_applications(
    auth: AuthUser,
    leaves: web::Data<LeaveWorkflow>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    Ok(HttpResponse::Ok().json(leaves.list_for_employee(employee_id).await?))
}

/* =========================
Pending queue (HR)
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/pending",
    responses(
        (status = 200, description = "Pending applications, oldest first", body = [crate::model::leave_request::LeaveEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_leaves(
    auth: AuthUser,
    leaves: web::Data<LeaveWorkflow>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;
    Ok(HttpResponse::Ok().json(leaves.list_pending().await?))
}

/* =========================
All applications (HR)
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves",
    responses(
        (status = 200, description = "Every application, newest first", body = [crate::model::leave_request::LeaveEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    leaves: web::Data<LeaveWorkflow>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;
    Ok(HttpResponse::Ok().json(leaves.list_all().await?))
}

/* =========================
Approve or decline (HR)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/status",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to review")
    ),
    request_body = LeaveDecisionBody,
    responses(
        (status = 200, description = "Leave request reviewed", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "Invalid status, or request not found or already reviewed", body = Object, example = json!({
            "message": "Leave request not found or already reviewed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn decide_leave(
    auth: AuthUser,
    leaves: web::Data<LeaveWorkflow>,
    path: web::Path<u64>,
    payload: web::Json<LeaveDecisionBody>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    let leave_id = path.into_inner();
    let LeaveDecisionBody {
        status,
        hr_comments,
    } = payload.into_inner();

    let status = status
        .ok_or_else(|| ServiceError::validation("Status is required."))?
        .parse::<LeaveStatus>()
        .map_err(|_| ServiceError::validation("Invalid leave status. Allowed: Approved, Declined"))?;

    let request = leaves
        .decide(leave_id, status, hr_comments, auth.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(request))
}
