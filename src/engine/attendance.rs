//! Attendance check-in and GPS geofence validation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{GeofenceBounds, GeofenceCheck, check_geofence};
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, AttendanceRecord, AttendanceStatus, Capability, Coordinate};
use crate::store::AttendanceRepository;

use super::PayrollEngine;

/// A day's check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    /// The employee checking in.
    pub employee_id: String,
    /// The attendance day.
    pub date: NaiveDate,
    /// Present for a full day, leave-short when leaving early.
    pub status: AttendanceStatus,
    /// Time of check-in.
    pub check_in: NaiveTime,
    /// Where the employee checked in from.
    pub location: Coordinate,
}

/// A corrected location, optionally against overridden bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// The new observed location.
    pub location: Coordinate,
    /// Reference point override.
    #[serde(default)]
    pub reference: Option<Coordinate>,
    /// Inner radius override in meters.
    #[serde(default)]
    pub radius_min: Option<f64>,
    /// Outer radius override in meters.
    #[serde(default)]
    pub radius_max: Option<f64>,
}

impl PayrollEngine {
    /// Checks an observed coordinate against the geofence.
    ///
    /// Any of `reference`, `radius_min` and `radius_max` left unset falls
    /// back to the configured defaults. An out-of-range location is not an
    /// error here; it is reported through [`GeofenceCheck::valid`].
    pub fn validate_geofence(
        &self,
        observed: Coordinate,
        reference: Option<Coordinate>,
        radius_min: Option<f64>,
        radius_max: Option<f64>,
    ) -> EngineResult<GeofenceCheck> {
        let bounds =
            GeofenceBounds::resolve(reference, radius_min, radius_max, self.config.geofence())?;
        check_geofence(observed, &bounds)
    }

    /// Records the actor's own attendance for a day.
    ///
    /// The location must lie within the configured geofence; each employee
    /// has at most one attendance record per day.
    pub fn check_in(&self, check_in: CheckIn, actor: &Actor) -> EngineResult<AttendanceRecord> {
        actor.require_owner(&check_in.employee_id, Capability::RecordAttendance)?;
        let bounds = GeofenceBounds::resolve(None, None, None, self.config.geofence())?;
        ensure_within(check_in.location, &bounds)?;

        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: check_in.employee_id,
            date: check_in.date,
            status: check_in.status,
            check_in: Some(check_in.check_in),
            check_out: None,
            location: Some(check_in.location),
        };
        self.store.insert_attendance(record.clone())?;

        info!(
            attendance_id = %record.id,
            employee_id = %record.employee_id,
            date = %record.date,
            "Attendance recorded"
        );
        Ok(record)
    }

    /// Replaces the location on an existing attendance record.
    ///
    /// The geofence is re-evaluated against the new location and any
    /// overridden bounds; a location outside them leaves the record
    /// unchanged.
    pub fn update_location(
        &self,
        attendance_id: Uuid,
        update: LocationUpdate,
        actor: &Actor,
    ) -> EngineResult<AttendanceRecord> {
        let mut record = self
            .store
            .get_attendance(attendance_id)?
            .ok_or_else(|| EngineError::not_found("attendance", attendance_id))?;
        actor.require_owner(&record.employee_id, Capability::RecordAttendance)?;

        let bounds = GeofenceBounds::resolve(
            update.reference,
            update.radius_min,
            update.radius_max,
            self.config.geofence(),
        )?;
        ensure_within(update.location, &bounds)?;

        record.location = Some(update.location);
        self.store.update_attendance(record.clone())?;

        info!(
            attendance_id = %record.id,
            employee_id = %record.employee_id,
            "Attendance location updated"
        );
        Ok(record)
    }
}

fn ensure_within(location: Coordinate, bounds: &GeofenceBounds) -> EngineResult<()> {
    let check = check_geofence(location, bounds)?;
    if check.valid {
        return Ok(());
    }

    warn!(
        distance_m = check.distance_m,
        radius_min = bounds.radius_min_m,
        radius_max = bounds.radius_max_m,
        "Location outside geofence"
    );
    Err(EngineError::OutsideGeofence {
        distance_m: check.distance_m,
        radius_min: bounds.radius_min_m,
        radius_max: bounds.radius_max_m,
    })
}
