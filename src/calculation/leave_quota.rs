//! Leave quota rules.
//!
//! Only personal leave is quota-limited. Fixed-term staff may take a limited
//! number of approved personal-leave days per calendar month, permanent staff
//! per calendar year, and freelancers have no quota.

use chrono::NaiveDate;

use crate::config::{LeaveRules, QuotaRule};
use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, EmployeeCategory, LeaveType, QuotaWindow};

/// Returns the quota that applies to a leave of `leave_type` taken by an
/// employee of `category`, or `None` if the leave is unlimited.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::applicable_quota;
/// use payroll_engine::config::LeaveRules;
/// use payroll_engine::models::{EmployeeCategory, LeaveType};
///
/// let rules = LeaveRules::default();
/// assert!(applicable_quota(EmployeeCategory::FixedTerm, LeaveType::PersonalLeave, &rules).is_some());
/// assert!(applicable_quota(EmployeeCategory::FixedTerm, LeaveType::SickLeave, &rules).is_none());
/// assert!(applicable_quota(EmployeeCategory::Freelance, LeaveType::PersonalLeave, &rules).is_none());
/// ```
pub fn applicable_quota(
    category: EmployeeCategory,
    leave_type: LeaveType,
    rules: &LeaveRules,
) -> Option<QuotaRule> {
    match leave_type {
        LeaveType::SickLeave => None,
        LeaveType::PersonalLeave => rules.personal_leave_quotas.get(&category).copied(),
    }
}

/// The date range of the quota window containing `date`.
pub fn quota_window_range(window: QuotaWindow, date: NaiveDate) -> EngineResult<DateRange> {
    let range = match window {
        QuotaWindow::Month => DateRange::month_of(date),
        QuotaWindow::Year => DateRange::year_of(date),
    };
    range.ok_or_else(|| EngineError::validation("date", format!("{} is out of range", date)))
}

/// Checks that one more approved day fits within the quota.
///
/// `current` is the number of approved days already counted in the window,
/// excluding the request being validated. The request fits while
/// `current < limit`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::check_quota;
/// use payroll_engine::config::QuotaRule;
/// use payroll_engine::models::{LeaveType, QuotaWindow};
///
/// let rule = QuotaRule { limit: 2, window: QuotaWindow::Month };
/// assert!(check_quota(LeaveType::PersonalLeave, rule, 1).is_ok());
/// assert!(check_quota(LeaveType::PersonalLeave, rule, 2).is_err());
/// ```
pub fn check_quota(leave_type: LeaveType, rule: QuotaRule, current: u32) -> EngineResult<()> {
    if current >= rule.limit {
        return Err(EngineError::QuotaExceeded {
            leave_type,
            window: rule.window,
            current,
            limit: rule.limit,
        });
    }
    Ok(())
}
