//! GPS geofence validation.
//!
//! A check-in is valid when its great-circle distance from the reference
//! coordinate lies within an annulus: `radius_min <= distance <= radius_max`.

use serde::{Deserialize, Serialize};

use crate::config::GeofenceDefaults;
use crate::error::{EngineError, EngineResult};
use crate::models::Coordinate;

/// Mean Earth radius in meters used by the Haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Floating-point slack applied to both bounds so a point placed exactly on a
/// boundary is not rejected by rounding in the trigonometry.
const BOUNDARY_TOLERANCE_M: f64 = 1e-6;

/// The resolved annulus a coordinate is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeofenceBounds {
    /// Centre of the annulus.
    pub reference: Coordinate,
    /// Inner radius in meters.
    pub radius_min_m: f64,
    /// Outer radius in meters.
    pub radius_max_m: f64,
}

impl GeofenceBounds {
    /// Resolves bounds from optional overrides, falling back to the defaults.
    ///
    /// Fails with a validation error if the radii are negative, not finite,
    /// or the inner radius exceeds the outer one.
    pub fn resolve(
        reference: Option<Coordinate>,
        radius_min_m: Option<f64>,
        radius_max_m: Option<f64>,
        defaults: &GeofenceDefaults,
    ) -> EngineResult<Self> {
        let bounds = Self {
            reference: reference.unwrap_or(defaults.reference),
            radius_min_m: radius_min_m.unwrap_or(defaults.radius_min_m),
            radius_max_m: radius_max_m.unwrap_or(defaults.radius_max_m),
        };

        validate_coordinate("reference", bounds.reference)?;
        if !bounds.radius_min_m.is_finite() || bounds.radius_min_m < 0.0 {
            return Err(EngineError::validation(
                "radius_min",
                "must be a non-negative number of meters",
            ));
        }
        if !bounds.radius_max_m.is_finite() || bounds.radius_max_m < bounds.radius_min_m {
            return Err(EngineError::validation(
                "radius_max",
                "must be at least radius_min",
            ));
        }

        Ok(bounds)
    }
}

/// The outcome of a geofence check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeofenceCheck {
    /// Whether the observed coordinate lies inside the annulus.
    pub valid: bool,
    /// Great-circle distance from the reference in meters.
    pub distance_m: f64,
}

/// Great-circle distance between two coordinates in meters (Haversine).
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::haversine_distance;
/// use payroll_engine::models::Coordinate;
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let one_degree_east = Coordinate::new(0.0, 1.0);
/// let distance = haversine_distance(origin, one_degree_east);
/// assert!((distance - 111_194.93).abs() < 0.01);
/// ```
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.latitude.to_radians();
    let phi_b = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Checks an observed coordinate against resolved bounds.
///
/// This is a pure function with no side effects; callers re-run it whenever
/// the location, reference or radii change.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{check_geofence, GeofenceBounds};
/// use payroll_engine::models::Coordinate;
///
/// let bounds = GeofenceBounds {
///     reference: Coordinate::new(0.0, 0.0),
///     radius_min_m: 20.0,
///     radius_max_m: 50.0,
/// };
/// let check = check_geofence(Coordinate::new(0.0, 0.0), &bounds).unwrap();
/// assert!(!check.valid); // too close: inside the inner radius
/// assert_eq!(check.distance_m, 0.0);
/// ```
pub fn check_geofence(observed: Coordinate, bounds: &GeofenceBounds) -> EngineResult<GeofenceCheck> {
    validate_coordinate("observed", observed)?;

    let distance_m = haversine_distance(observed, bounds.reference);
    let valid = distance_m >= bounds.radius_min_m - BOUNDARY_TOLERANCE_M
        && distance_m <= bounds.radius_max_m + BOUNDARY_TOLERANCE_M;

    Ok(GeofenceCheck { valid, distance_m })
}

fn validate_coordinate(field: &str, coordinate: Coordinate) -> EngineResult<()> {
    let lat_ok = coordinate.latitude.is_finite() && coordinate.latitude.abs() <= 90.0;
    let lon_ok = coordinate.longitude.is_finite() && coordinate.longitude.abs() <= 180.0;
    if lat_ok && lon_ok {
        Ok(())
    } else {
        Err(EngineError::validation(
            field,
            format!(
                "({}, {}) is not a valid latitude/longitude",
                coordinate.latitude, coordinate.longitude
            ),
        ))
    }
}
