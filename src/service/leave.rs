use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use strum_macros::EnumString;
use tracing::info;

use crate::error::ServiceError;
use crate::model::leave_request::{LeaveDecision, LeaveEntry, LeaveRequest, LeaveStatus, NewLeave};
use crate::store::LeaveStore;

/// How a submitted `num_days` is checked against the requested range.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum DayCountPolicy {
    /// Accept the caller's figure as long as it is positive.
    #[default]
    Trust,
    /// Require it to equal the Monday to Friday count of `from_date..=to_date`.
    WorkingDays,
}

/// Number of weekdays in the inclusive range.
pub fn working_days(from: NaiveDate, to: NaiveDate) -> u32 {
    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}

/// Raw employee submission; every field is required.
#[derive(Debug, Default, Clone)]
pub struct LeaveApplication {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub num_days: Option<i64>,
}

/// Pending -> Approved | Declined. Terminal states never change again.
pub struct LeaveWorkflow {
    store: Arc<dyn LeaveStore>,
    policy: DayCountPolicy,
}

impl LeaveWorkflow {
    pub fn new(store: Arc<dyn LeaveStore>, policy: DayCountPolicy) -> Self {
        Self { store, policy }
    }

    pub async fn submit(
        &self,
        employee_id: u64,
        application: LeaveApplication,
    ) -> Result<LeaveRequest, ServiceError> {
        let new = self.validate(employee_id, application)?;
        let request = self.store.insert(new).await?;

        info!(
            employee_id,
            leave_id = request.leave_id,
            num_days = request.num_days,
            "Leave request submitted"
        );
        Ok(request)
    }

    fn validate(
        &self,
        employee_id: u64,
        application: LeaveApplication,
    ) -> Result<NewLeave, ServiceError> {
        let LeaveApplication {
            from_date: Some(from_date),
            to_date: Some(to_date),
            return_date: Some(return_date),
            reason: Some(reason),
            num_days: Some(num_days),
        } = application
        else {
            return Err(ServiceError::validation(
                "Please provide from date, to date, return date, reason, and total number of days for leave.",
            ));
        };

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::validation("Reason must not be empty."));
        }
        if from_date > to_date {
            return Err(ServiceError::validation("Start date cannot be after end date."));
        }
        if return_date <= to_date {
            return Err(ServiceError::validation("Return date must be after the to date."));
        }
        let num_days = u32::try_from(num_days)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ServiceError::validation("Total days must be a positive number."))?;

        if self.policy == DayCountPolicy::WorkingDays {
            let expected = working_days(from_date, to_date);
            if expected != num_days {
                return Err(ServiceError::validation(format!(
                    "Total days ({num_days}) does not match the {expected} working days between {from_date} and {to_date}."
                )));
            }
        }

        Ok(NewLeave {
            employee_id,
            from_date,
            to_date,
            return_date,
            num_days,
            reason: reason.to_string(),
        })
    }

    /// HR decision. The status check and the write are one conditional update,
    /// so of two racing reviewers exactly one wins.
    pub async fn decide(
        &self,
        leave_id: u64,
        decision: LeaveStatus,
        hr_comments: Option<String>,
        actor: u64,
    ) -> Result<LeaveRequest, ServiceError> {
        if !decision.is_terminal() {
            return Err(ServiceError::validation(
                "Invalid leave status. Allowed: Approved, Declined",
            ));
        }
        let hr_comments = hr_comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let updated = self
            .store
            .decide_pending(
                leave_id,
                LeaveDecision {
                    status: decision,
                    hr_comments,
                    reviewed_by: actor,
                    reviewed_at: Utc::now(),
                },
            )
            .await?
            .ok_or(ServiceError::NotFoundOrAlreadyReviewed)?;

        info!(leave_id, status = decision.as_ref(), reviewed_by = actor, "Leave request reviewed");
        Ok(updated)
    }

    pub async fn list_for_employee(&self, employee_id: u64) -> Result<Vec<LeaveRequest>, ServiceError> {
        Ok(self.store.list_for_employee(employee_id).await?)
    }

    pub async fn list_pending(&self) -> Result<Vec<LeaveEntry>, ServiceError> {
        Ok(self.store.list_pending().await?)
    }

    pub async fn list_all(&self) -> Result<Vec<LeaveEntry>, ServiceError> {
        Ok(self.store.list_all().await?)
    }
}
