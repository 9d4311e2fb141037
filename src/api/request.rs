//! Request types for the payroll engine API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Coordinate, LeaveType, Period};

/// Body of the batch generation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// The month to generate, as `YYYY-MM`.
    pub period: Period,
}

/// Body of `POST /leave/quota-check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaCheckRequest {
    /// The employee taking leave.
    pub employee_id: String,
    /// The leave type requested.
    pub leave_type: LeaveType,
    /// The day requested.
    pub date: NaiveDate,
    /// A request to leave out of the approved count.
    #[serde(default)]
    pub exclude_id: Option<Uuid>,
}

/// Response of `POST /leave/quota-check` when the day fits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaCheckResponse {
    /// Always true; a quota violation is returned as an error.
    pub within_quota: bool,
}

/// Body of `POST /leave/requests/:id/cancellation`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CancellationDecision {
    /// True cancels the leave, false keeps it approved.
    pub confirm: bool,
}

/// Body of `POST /geofence/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceCheckRequest {
    /// The coordinate to check.
    pub observed: Coordinate,
    /// Reference point; the configured office if omitted.
    #[serde(default)]
    pub reference: Option<Coordinate>,
    /// Inner radius in meters.
    #[serde(default)]
    pub radius_min: Option<f64>,
    /// Outer radius in meters.
    #[serde(default)]
    pub radius_max: Option<f64>,
}
