//! Response types for the payroll engine API.
//!
//! This module defines the error response structures and the mapping from
//! engine errors to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for a request without a usable actor identity.
    pub fn missing_actor(message: impl Into<String>) -> Self {
        Self::with_details(
            "MISSING_ACTOR",
            message,
            "Requests must carry x-actor-id and x-actor-role headers",
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = match &error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::InvalidPeriod { .. }
            | EngineError::Validation { .. }
            | EngineError::InvalidTransition { .. }
            | EngineError::OutsideGeofence { .. } => StatusCode::BAD_REQUEST,
            EngineError::QuotaExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::Conflict { .. } => StatusCode::CONFLICT,
            EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        };

        let details = match &error {
            EngineError::QuotaExceeded {
                current,
                limit,
                window,
                ..
            } => Some(format!(
                "{} approved day(s) already counted against a limit of {} per {}",
                current, limit, window
            )),
            EngineError::OutsideGeofence {
                distance_m,
                radius_min,
                radius_max,
            } => Some(format!(
                "distance {:.2}m, allowed {}m to {}m",
                distance_m, radius_min, radius_max
            )),
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                Some("The engine configuration could not be loaded".to_string())
            }
            _ => None,
        };

        let code = error.code();
        let message = error.to_string();
        ApiErrorResponse {
            status,
            error: match details {
                Some(details) => ApiError::with_details(code, message, details),
                None => ApiError::new(code, message),
            },
        }
    }
}
