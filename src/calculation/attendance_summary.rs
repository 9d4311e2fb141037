//! Attendance aggregation.
//!
//! Reduces one employee's attendance and leave rows for a period into day-type
//! counts for the monthly recap.

use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, AttendanceStatus, LeaveRequest, LeaveType, Period};

/// Day-type counts for one employee and period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days in the period excluding Sundays.
    pub working_days: u32,
    /// Days with a present attendance record.
    pub present: u32,
    /// Short-leave attendance days plus approved personal-leave days.
    pub personal_leave: u32,
    /// Approved sick-leave days.
    pub sick_leave: u32,
    /// Working days not covered by any of the above, floored at zero.
    pub unexcused_absence: u32,
}

/// Summarizes attendance and leave rows for a period.
///
/// Rows dated outside the period are ignored. Leave requests only count once
/// approved; submitted, rejected, cancelled and cancellation-requested
/// requests are not leave days.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::summarize_attendance;
/// use payroll_engine::models::Period;
///
/// let period: Period = "2026-02".parse().unwrap();
/// let summary = summarize_attendance(&period, &[], &[]);
/// assert_eq!(summary.working_days, 24);
/// assert_eq!(summary.unexcused_absence, 24);
/// ```
pub fn summarize_attendance(
    period: &Period,
    attendance: &[AttendanceRecord],
    leaves: &[LeaveRequest],
) -> AttendanceSummary {
    let count_attendance = |status: AttendanceStatus| {
        attendance
            .iter()
            .filter(|a| period.contains(a.date) && a.status == status)
            .count() as u32
    };
    let count_leave = |leave_type: LeaveType| {
        leaves
            .iter()
            .filter(|l| period.contains(l.date) && l.is_approved(leave_type))
            .count() as u32
    };

    let working_days = period.working_days();
    let present = count_attendance(AttendanceStatus::Present);
    let personal_leave =
        count_attendance(AttendanceStatus::LeaveShort) + count_leave(LeaveType::PersonalLeave);
    let sick_leave = count_leave(LeaveType::SickLeave);
    let unexcused_absence = working_days.saturating_sub(present + personal_leave + sick_leave);

    AttendanceSummary {
        working_days,
        present,
        personal_leave,
        sick_leave,
        unexcused_absence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn attendance(day: u32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            date: date(day),
            status,
            check_in: None,
            check_out: None,
            location: None,
        }
    }

    fn leave(day: u32, leave_type: LeaveType, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            date: date(day),
            leave_type,
            status,
            approver_id: None,
            reason: None,
        }
    }

    fn january() -> Period {
        "2026-01".parse().unwrap()
    }

    #[test]
    fn test_counts_each_day_type() {
        let records = vec![
            attendance(5, AttendanceStatus::Present),
            attendance(6, AttendanceStatus::Present),
            attendance(7, AttendanceStatus::LeaveShort),
        ];
        let leaves = vec![
            leave(8, LeaveType::PersonalLeave, LeaveStatus::Approved),
            leave(9, LeaveType::SickLeave, LeaveStatus::Approved),
            leave(12, LeaveType::SickLeave, LeaveStatus::Approved),
        ];

        let summary = summarize_attendance(&january(), &records, &leaves);
        assert_eq!(summary.working_days, 27);
        assert_eq!(summary.present, 2);
        assert_eq!(summary.personal_leave, 2);
        assert_eq!(summary.sick_leave, 2);
        assert_eq!(summary.unexcused_absence, 21);
    }

    #[test]
    fn test_only_approved_leave_counts() {
        let leaves = vec![
            leave(5, LeaveType::PersonalLeave, LeaveStatus::Submitted),
            leave(6, LeaveType::PersonalLeave, LeaveStatus::Rejected),
            leave(7, LeaveType::PersonalLeave, LeaveStatus::Cancelled),
            leave(8, LeaveType::SickLeave, LeaveStatus::CancellationRequested),
        ];

        let summary = summarize_attendance(&january(), &[], &leaves);
        assert_eq!(summary.personal_leave, 0);
        assert_eq!(summary.sick_leave, 0);
        assert_eq!(summary.unexcused_absence, summary.working_days);
    }

    #[test]
    fn test_rows_outside_period_ignored() {
        let mut outside = attendance(5, AttendanceStatus::Present);
        outside.date = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();

        let summary = summarize_attendance(&january(), &[outside], &[]);
        assert_eq!(summary.present, 0);
    }

    #[test]
    fn test_unexcused_absence_floors_at_zero() {
        // Present every day of January including Sundays: 31 > 27 working days
        let records: Vec<AttendanceRecord> = (1..=31)
            .map(|d| attendance(d, AttendanceStatus::Present))
            .collect();

        let summary = summarize_attendance(&january(), &records, &[]);
        assert_eq!(summary.present, 31);
        assert_eq!(summary.unexcused_absence, 0);
    }

    #[test]
    fn test_counts_sum_to_working_days() {
        let records = vec![
            attendance(2, AttendanceStatus::Present),
            attendance(3, AttendanceStatus::LeaveShort),
        ];
        let leaves = vec![leave(5, LeaveType::SickLeave, LeaveStatus::Approved)];

        let s = summarize_attendance(&january(), &records, &leaves);
        assert_eq!(
            s.present + s.personal_leave + s.sick_leave + s.unexcused_absence,
            s.working_days
        );
    }
}
