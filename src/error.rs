//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during aggregation, payroll
//! computation and validation.

use thiserror::Error;

use crate::models::{Capability, LeaveType, QuotaWindow};

/// The main error type for the payroll engine.
///
/// Validators and generation flows return this error type; the boundary layer
/// maps each variant to a transport-specific response.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidPeriod {
///     value: "2026-13".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid period '2026-13': expected YYYY-MM");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A period string was not a valid `YYYY-MM` month.
    #[error("Invalid period '{value}': expected YYYY-MM")]
    InvalidPeriod {
        /// The rejected input.
        value: String,
    },

    /// A request field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A status change was attempted that the entity's lifecycle does not allow.
    #[error("Invalid {entity} transition from {from} to {to}")]
    InvalidTransition {
        /// The kind of record being transitioned (e.g. "leave request").
        entity: String,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// A check-in location fell outside the allowed annulus.
    #[error(
        "Location is {distance_m:.2}m from the reference point, allowed range is {radius_min}m to {radius_max}m"
    )]
    OutsideGeofence {
        /// Observed great-circle distance in meters.
        distance_m: f64,
        /// Inner radius in meters.
        radius_min: f64,
        /// Outer radius in meters.
        radius_max: f64,
    },

    /// A leave request would exceed the employee's quota for the window.
    #[error("{leave_type} quota exceeded: {current} of {limit} already approved this {window}")]
    QuotaExceeded {
        /// The leave type that is quota-limited.
        leave_type: LeaveType,
        /// The window the quota applies to.
        window: QuotaWindow,
        /// The number of approved days already counted in the window.
        current: u32,
        /// The configured ceiling for the window.
        limit: u32,
    },

    /// A unique constraint rejected a write (duplicate slot claim or day).
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting record.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "employee", "recap").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The acting user lacks the capability an operation requires.
    #[error("Actor '{actor_id}' is not allowed to {capability}")]
    Unauthorized {
        /// The actor that attempted the operation.
        actor_id: String,
        /// The capability that was missing.
        capability: Capability,
    },

    /// The persistence collaborator failed.
    #[error("Store error: {message}")]
    Store {
        /// A description of the backend failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::NotFound`] error.
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::InvalidPeriod { .. } => "INVALID_PERIOD",
            EngineError::Validation { .. } => "VALIDATION_ERROR",
            EngineError::InvalidTransition { .. } => "INVALID_TRANSITION",
            EngineError::OutsideGeofence { .. } => "OUTSIDE_GEOFENCE",
            EngineError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            EngineError::Conflict { .. } => "CONFLICT",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::Unauthorized { .. } => "UNAUTHORIZED",
            EngineError::Store { .. } => "STORE_ERROR",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
