//! Attendance records and GPS coordinates.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a day's attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The employee was present.
    Present,
    /// Short personal leave taken against the day ("izin").
    LeaveShort,
}

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One employee's attendance for one calendar day.
///
/// The store guarantees at most one record per (employee, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// Attendance status for the day.
    pub status: AttendanceStatus,
    /// Check-in time, if recorded.
    #[serde(default)]
    pub check_in: Option<NaiveTime>,
    /// Check-out time, if recorded.
    #[serde(default)]
    pub check_out: Option<NaiveTime>,
    /// Where the employee checked in from.
    #[serde(default)]
    pub location: Option<Coordinate>,
}
