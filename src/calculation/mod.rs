//! Pure calculation logic for the payroll engine.
//!
//! This module contains the functions that do not touch storage: attendance
//! and session aggregation for recaps, payroll computation with its audit
//! steps, leave-quota rules, the GPS geofence check, and the status
//! lifecycles for leave, realizations and payrolls.

mod attendance_summary;
mod geofence;
mod leave_quota;
mod payroll;
mod session_summary;
mod transitions;

pub use attendance_summary::{AttendanceSummary, summarize_attendance};
pub use geofence::{
    EARTH_RADIUS_M, GeofenceBounds, GeofenceCheck, check_geofence, haversine_distance,
};
pub use leave_quota::{applicable_quota, check_quota, quota_window_range};
pub use payroll::{PayrollCalculation, calculate_payroll};
pub use session_summary::{SessionSummary, summarize_sessions};
pub use transitions::{
    LeaveAction, next_leave_status, next_payroll_status, next_realization_status,
};
