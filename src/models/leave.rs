//! Leave requests and their lifecycle states.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of leave requested.
///
/// Only personal leave is quota-limited; sick leave is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Personal leave ("cuti"), counted against the category quota.
    PersonalLeave,
    /// Sick leave, never quota-limited.
    SickLeave,
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LeaveType::PersonalLeave => "personal_leave",
            LeaveType::SickLeave => "sick_leave",
        })
    }
}

/// Lifecycle status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Submitted by the employee, awaiting a decision.
    Submitted,
    /// Approved by an authorized approver.
    Approved,
    /// Rejected by an authorized approver.
    Rejected,
    /// Cancelled, either by the employee or after a cancellation request.
    Cancelled,
    /// The employee asked to cancel an approved leave.
    CancellationRequested,
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LeaveStatus::Submitted => "submitted",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
            LeaveStatus::CancellationRequested => "cancellation_requested",
        })
    }
}

/// The window a leave quota is counted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaWindow {
    /// The calendar month of the leave date.
    Month,
    /// The calendar year of the leave date.
    Year,
}

impl fmt::Display for QuotaWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuotaWindow::Month => "month",
            QuotaWindow::Year => "year",
        })
    }
}

/// A leave request for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The employee taking leave.
    pub employee_id: String,
    /// The day of leave.
    pub date: NaiveDate,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// Current lifecycle status.
    pub status: LeaveStatus,
    /// The approver who last decided on the request.
    #[serde(default)]
    pub approver_id: Option<String>,
    /// Free-text reason given by the employee.
    #[serde(default)]
    pub reason: Option<String>,
}

impl LeaveRequest {
    /// Returns true if this request counts as an approved day of the given type.
    pub fn is_approved(&self, leave_type: LeaveType) -> bool {
        self.status == LeaveStatus::Approved && self.leave_type == leave_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(status: LeaveStatus, leave_type: LeaveType) -> LeaveRequest {
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            leave_type,
            status,
            approver_id: None,
            reason: None,
        }
    }

    #[test]
    fn test_is_approved_matches_type_and_status() {
        let approved = create_request(LeaveStatus::Approved, LeaveType::SickLeave);
        assert!(approved.is_approved(LeaveType::SickLeave));
        assert!(!approved.is_approved(LeaveType::PersonalLeave));

        let pending = create_request(LeaveStatus::CancellationRequested, LeaveType::SickLeave);
        assert!(!pending.is_approved(LeaveType::SickLeave));
    }

    #[test]
    fn test_display_matches_serde() {
        for status in [
            LeaveStatus::Submitted,
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
            LeaveStatus::CancellationRequested,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        assert_eq!(
            serde_json::to_string(&LeaveType::PersonalLeave).unwrap(),
            format!("\"{}\"", LeaveType::PersonalLeave)
        );
    }
}
