//! Monthly recap model.
//!
//! A recap is the per-employee, per-month aggregate of attendance, leave and
//! session data. There is at most one recap per (employee, period); it is
//! rebuilt by overwrite, never appended.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Period;

/// Per-employee summary of one period.
///
/// Day counts satisfy
/// `present + personal_leave + sick_leave + unexcused_absence == working_days`
/// whenever the recorded days do not exceed the working days.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{MonthlyRecap, Period};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let recap = MonthlyRecap {
///     id: Uuid::new_v4(),
///     employee_id: "emp_001".to_string(),
///     period: "2026-01".parse::<Period>().unwrap(),
///     working_days: 27,
///     present_days: 24,
///     personal_leave_days: 1,
///     sick_leave_days: 1,
///     unexcused_absence_days: 1,
///     coding_sessions: 0,
///     coding_income: Decimal::ZERO,
///     non_coding_sessions: 0,
///     non_coding_income: Decimal::ZERO,
///     total_session_income: Decimal::ZERO,
/// };
/// assert_eq!(recap.leave_days(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRecap {
    /// Unique identifier, stable across regenerations.
    pub id: Uuid,
    /// The employee summarized.
    pub employee_id: String,
    /// The month summarized.
    pub period: Period,
    /// Days in the period excluding Sundays.
    pub working_days: u32,
    /// Days with a present attendance record.
    pub present_days: u32,
    /// Short-leave attendance days plus approved personal-leave days.
    pub personal_leave_days: u32,
    /// Approved sick-leave days.
    pub sick_leave_days: u32,
    /// Working days not otherwise accounted for.
    pub unexcused_absence_days: u32,
    /// Approved coding sessions.
    pub coding_sessions: u32,
    /// Sum of approved coding session rates.
    pub coding_income: Decimal,
    /// Approved non-coding sessions.
    pub non_coding_sessions: u32,
    /// Sum of approved non-coding session rates.
    pub non_coding_income: Decimal,
    /// Coding plus non-coding income.
    pub total_session_income: Decimal,
}

impl MonthlyRecap {
    /// Days of leave that reduce salaried pay.
    pub fn leave_days(&self) -> u32 {
        self.personal_leave_days + self.sick_leave_days
    }

    /// Days accounted for by attendance, leave or absence.
    pub fn accounted_days(&self) -> u32 {
        self.present_days
            + self.personal_leave_days
            + self.sick_leave_days
            + self.unexcused_absence_days
    }
}
