//! Work sessions and session realizations.
//!
//! A work session is a scheduled slot with a per-session rate. A realization
//! is one employee's claim that they performed that slot on a given date.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCategory {
    /// Coding class or work slot.
    Coding,
    /// Any other teaching or work slot.
    NonCoding,
}

/// A scheduled work slot.
///
/// (category, day of week, session number) is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSession {
    /// Unique identifier for the session.
    pub id: String,
    /// The session category.
    pub category: SessionCategory,
    /// The weekday the session is scheduled on.
    pub day_of_week: Weekday,
    /// Ordinal of the session within its day.
    pub session_number: u8,
    /// Scheduled start time.
    pub start_time: NaiveTime,
    /// Scheduled end time.
    pub end_time: NaiveTime,
    /// Amount paid per realized session.
    pub rate: Decimal,
    /// Whether new realizations may be claimed against this session.
    pub active: bool,
}

/// Approval status of a session realization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealizationStatus {
    /// Claimed, awaiting a decision.
    Submitted,
    /// Approved; terminal.
    Approved,
    /// Rejected; terminal.
    Rejected,
}

impl fmt::Display for RealizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RealizationStatus::Submitted => "submitted",
            RealizationStatus::Approved => "approved",
            RealizationStatus::Rejected => "rejected",
        })
    }
}

/// Whether a realization was part of the regular load or extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealizationSource {
    /// Part of the employee's regular schedule.
    Scheduled,
    /// Outside the regular load, paid separately as overtime.
    Overtime,
}

/// One employee's claim to have performed a work session on a date.
///
/// (date, work session) is unique across all employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRealization {
    /// Unique identifier for the realization.
    pub id: Uuid,
    /// The claiming employee.
    pub employee_id: String,
    /// The session that was performed.
    pub work_session_id: String,
    /// The date it was performed.
    pub date: NaiveDate,
    /// Approval status.
    pub status: RealizationStatus,
    /// Scheduled or overtime.
    pub source: RealizationSource,
    /// The approver who decided on the claim.
    #[serde(default)]
    pub approver_id: Option<String>,
}

/// A realization together with its linked work session, if it still resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRealization {
    /// The realization row.
    pub realization: SessionRealization,
    /// The linked session; `None` if it no longer exists.
    pub session: Option<WorkSession>,
}

impl ResolvedRealization {
    /// The session rate if this realization is approved and resolves.
    pub fn approved_rate(&self) -> Option<Decimal> {
        if self.realization.status != RealizationStatus::Approved {
            return None;
        }
        self.session.as_ref().map(|s| s.rate)
    }
}
