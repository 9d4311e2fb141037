//! Status lifecycles for leave requests, session realizations and payrolls.
//!
//! Each function maps a current status and a requested action to the next
//! status, or fails with [`EngineError::InvalidTransition`]. Terminal states
//! (rejected, cancelled, paid) accept no further actions.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveStatus, PayrollStatus, RealizationStatus};

/// An action applied to a leave request after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveAction {
    /// Supervisor approves a submitted request.
    Approve,
    /// Supervisor rejects a submitted request.
    Reject,
    /// Employee withdraws a request that is still submitted.
    Cancel,
    /// Employee asks to cancel an approved request.
    RequestCancellation,
    /// Supervisor confirms a cancellation request.
    ConfirmCancellation,
    /// Supervisor declines a cancellation request; the leave stays approved.
    RevertCancellation,
}

impl LeaveAction {
    fn target(self) -> LeaveStatus {
        match self {
            LeaveAction::Approve | LeaveAction::RevertCancellation => LeaveStatus::Approved,
            LeaveAction::Reject => LeaveStatus::Rejected,
            LeaveAction::Cancel | LeaveAction::ConfirmCancellation => LeaveStatus::Cancelled,
            LeaveAction::RequestCancellation => LeaveStatus::CancellationRequested,
        }
    }
}

/// Returns the leave status reached by applying `action` to `current`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{next_leave_status, LeaveAction};
/// use payroll_engine::models::LeaveStatus;
///
/// let next = next_leave_status(LeaveStatus::Approved, LeaveAction::RequestCancellation).unwrap();
/// assert_eq!(next, LeaveStatus::CancellationRequested);
/// assert!(next_leave_status(LeaveStatus::Rejected, LeaveAction::Approve).is_err());
/// ```
pub fn next_leave_status(current: LeaveStatus, action: LeaveAction) -> EngineResult<LeaveStatus> {
    use LeaveAction::*;
    use LeaveStatus::*;

    let allowed = matches!(
        (current, action),
        (Submitted, Approve | Reject | Cancel)
            | (Approved, RequestCancellation)
            | (CancellationRequested, ConfirmCancellation | RevertCancellation)
    );

    if allowed {
        Ok(action.target())
    } else {
        Err(invalid("leave request", current, action.target()))
    }
}

/// Returns `next` if a realization in `current` may move to it.
///
/// Only submitted realizations can be decided, and only to approved or
/// rejected.
pub fn next_realization_status(
    current: RealizationStatus,
    next: RealizationStatus,
) -> EngineResult<RealizationStatus> {
    match (current, next) {
        (
            RealizationStatus::Submitted,
            RealizationStatus::Approved | RealizationStatus::Rejected,
        ) => Ok(next),
        _ => Err(invalid("session realization", current, next)),
    }
}

/// Returns `next` if a payroll in `current` may move to it.
///
/// Payrolls advance strictly draft, approved, paid.
pub fn next_payroll_status(current: PayrollStatus, next: PayrollStatus) -> EngineResult<PayrollStatus> {
    match (current, next) {
        (PayrollStatus::Draft, PayrollStatus::Approved)
        | (PayrollStatus::Approved, PayrollStatus::Paid) => Ok(next),
        _ => Err(invalid("payroll", current, next)),
    }
}

fn invalid(entity: &str, from: impl ToString, to: impl ToString) -> EngineError {
    EngineError::InvalidTransition {
        entity: entity.to_string(),
        from: from.to_string(),
        to: to.to_string(),
    }
}
