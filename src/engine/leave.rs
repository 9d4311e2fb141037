//! Leave quota validation and the leave request workflow.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    LeaveAction, applicable_quota, check_quota, next_leave_status, quota_window_range,
};
use crate::config::QuotaRule;
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, Capability, LeaveRequest, LeaveStatus, LeaveType};
use crate::store::{LeaveGuard, LeaveRepository, QuotaGuard, StoreError};

use super::PayrollEngine;

/// A new leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSubmission {
    /// The employee taking leave.
    pub employee_id: String,
    /// The day of leave.
    pub date: NaiveDate,
    /// Personal or sick leave.
    pub leave_type: LeaveType,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A change of date or type on an existing leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveReschedule {
    /// The new day of leave.
    pub date: NaiveDate,
    /// The new leave type.
    pub leave_type: LeaveType,
}

impl PayrollEngine {
    /// Checks that one more approved day of `leave_type` on `date` fits the
    /// employee's quota.
    ///
    /// `exclude_id` names a request that should not count towards the
    /// current total, so an edit to an already-approved request can be
    /// checked without counting it twice. Sick leave and freelancers are
    /// unlimited.
    pub fn validate_leave_quota(
        &self,
        employee_id: &str,
        leave_type: LeaveType,
        date: NaiveDate,
        exclude_id: Option<Uuid>,
    ) -> EngineResult<()> {
        self.checked_quota(employee_id, leave_type, date, exclude_id)
            .map(|_| ())
    }

    /// Submits a leave request on the actor's own behalf.
    ///
    /// The quota is checked up front so a request that could never be
    /// approved is refused immediately.
    pub fn submit_leave(
        &self,
        submission: LeaveSubmission,
        actor: &Actor,
    ) -> EngineResult<LeaveRequest> {
        actor.require_owner(&submission.employee_id, Capability::SubmitLeave)?;
        self.validate_leave_quota(
            &submission.employee_id,
            submission.leave_type,
            submission.date,
            None,
        )?;

        let request = LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: submission.employee_id,
            date: submission.date,
            leave_type: submission.leave_type,
            status: LeaveStatus::Submitted,
            approver_id: None,
            reason: submission.reason,
        };
        self.store.insert_leave(request.clone())?;

        info!(
            leave_id = %request.id,
            employee_id = %request.employee_id,
            date = %request.date,
            leave_type = %request.leave_type,
            "Leave submitted"
        );
        Ok(request)
    }

    /// Approves a submitted request, re-checking the quota and stamping the
    /// approver.
    ///
    /// The quota is checked again under the store's write lock, so two
    /// approvals racing for the last free day cannot both succeed.
    pub fn approve_leave(&self, leave_id: Uuid, actor: &Actor) -> EngineResult<LeaveRequest> {
        let request = self.leave(leave_id)?;
        let status = next_leave_status(request.status, LeaveAction::Approve)?;
        let rule = self.checked_quota(
            &request.employee_id,
            request.leave_type,
            request.date,
            Some(request.id),
        )?;

        let expected = request.status;
        self.save_leave(
            LeaveRequest {
                status,
                approver_id: Some(actor.id.clone()),
                ..request
            },
            expected,
            rule,
            actor,
        )
    }

    /// Rejects a submitted request.
    pub fn reject_leave(&self, leave_id: Uuid, actor: &Actor) -> EngineResult<LeaveRequest> {
        let request = self.leave(leave_id)?;
        let status = next_leave_status(request.status, LeaveAction::Reject)?;

        let expected = request.status;
        self.save_leave(
            LeaveRequest {
                status,
                approver_id: Some(actor.id.clone()),
                ..request
            },
            expected,
            None,
            actor,
        )
    }

    /// Withdraws the actor's own request while it is still submitted.
    pub fn cancel_leave(&self, leave_id: Uuid, actor: &Actor) -> EngineResult<LeaveRequest> {
        let request = self.leave(leave_id)?;
        actor.require_owner(&request.employee_id, Capability::SubmitLeave)?;
        let status = next_leave_status(request.status, LeaveAction::Cancel)?;

        let expected = request.status;
        self.save_leave(LeaveRequest { status, ..request }, expected, None, actor)
    }

    /// Asks for the actor's own approved request to be cancelled.
    pub fn request_leave_cancellation(
        &self,
        leave_id: Uuid,
        actor: &Actor,
    ) -> EngineResult<LeaveRequest> {
        let request = self.leave(leave_id)?;
        actor.require_owner(&request.employee_id, Capability::SubmitLeave)?;
        let status = next_leave_status(request.status, LeaveAction::RequestCancellation)?;

        let expected = request.status;
        self.save_leave(LeaveRequest { status, ..request }, expected, None, actor)
    }

    /// Resolves a cancellation request: `confirm` cancels the leave,
    /// otherwise it reverts to approved.
    pub fn resolve_leave_cancellation(
        &self,
        leave_id: Uuid,
        confirm: bool,
        actor: &Actor,
    ) -> EngineResult<LeaveRequest> {
        let request = self.leave(leave_id)?;
        let action = if confirm {
            LeaveAction::ConfirmCancellation
        } else {
            LeaveAction::RevertCancellation
        };
        let status = next_leave_status(request.status, action)?;

        let expected = request.status;
        self.save_leave(LeaveRequest { status, ..request }, expected, None, actor)
    }

    /// Moves the actor's own submitted or approved request to another date or
    /// type.
    ///
    /// The quota is re-validated for the new date with this request excluded
    /// from the count.
    pub fn reschedule_leave(
        &self,
        leave_id: Uuid,
        change: LeaveReschedule,
        actor: &Actor,
    ) -> EngineResult<LeaveRequest> {
        let request = self.leave(leave_id)?;
        actor.require_owner(&request.employee_id, Capability::SubmitLeave)?;
        if !matches!(request.status, LeaveStatus::Submitted | LeaveStatus::Approved) {
            return Err(EngineError::validation(
                "status",
                format!("a {} leave request cannot be rescheduled", request.status),
            ));
        }

        let rule = self.checked_quota(
            &request.employee_id,
            change.leave_type,
            change.date,
            Some(request.id),
        )?;

        let expected = request.status;
        self.save_leave(
            LeaveRequest {
                date: change.date,
                leave_type: change.leave_type,
                ..request
            },
            expected,
            rule,
            actor,
        )
    }

    /// Runs the quota check and returns the rule it applied, if any.
    fn checked_quota(
        &self,
        employee_id: &str,
        leave_type: LeaveType,
        date: NaiveDate,
        exclude_id: Option<Uuid>,
    ) -> EngineResult<Option<QuotaRule>> {
        let employee = self.employee(employee_id)?;
        let rules = &self.config.config().leave;
        let Some(rule) = applicable_quota(employee.category, leave_type, rules) else {
            return Ok(None);
        };

        let window = quota_window_range(rule.window, date)?;
        let current = self
            .store
            .count_approved_leave(employee_id, leave_type, window, exclude_id)?;

        check_quota(leave_type, rule, current).inspect_err(|err| {
            warn!(
                employee_id = %employee_id,
                date = %date,
                error = %err,
                "Leave quota check failed"
            );
        })?;
        Ok(Some(rule))
    }

    fn leave(&self, leave_id: Uuid) -> EngineResult<LeaveRequest> {
        self.store
            .get_leave(leave_id)?
            .ok_or_else(|| EngineError::not_found("leave request", leave_id))
    }

    /// Writes the request if it is still in `expected`, holding it to `rule`
    /// when one applies.
    fn save_leave(
        &self,
        request: LeaveRequest,
        expected: LeaveStatus,
        rule: Option<QuotaRule>,
        actor: &Actor,
    ) -> EngineResult<LeaveRequest> {
        let quota = match rule {
            Some(rule) => Some((rule, quota_window_range(rule.window, request.date)?)),
            None => None,
        };
        let guard = LeaveGuard {
            expected,
            quota: quota.map(|(rule, window)| QuotaGuard {
                window,
                limit: rule.limit,
            }),
        };

        self.store
            .update_leave(request.clone(), guard)
            .map_err(|err| match (err, quota) {
                (StoreError::QuotaReached { current, limit }, Some((rule, _))) => {
                    EngineError::QuotaExceeded {
                        leave_type: request.leave_type,
                        window: rule.window,
                        current,
                        limit,
                    }
                }
                (err, _) => EngineError::from(err),
            })?;
        info!(
            leave_id = %request.id,
            status = %request.status,
            actor_id = %actor.id,
            "Leave request updated"
        );
        Ok(request)
    }
}
