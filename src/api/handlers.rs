//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! workflow handler resolves the acting user from the `x-actor-id` and
//! `x-actor-role` headers through the role policy table and checks it holds
//! the operation's capability before calling into the engine.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::engine::{CheckIn, LeaveReschedule, LeaveSubmission, LocationUpdate, SessionClaim};
use crate::error::EngineResult;
use crate::models::{Actor, Capability, Role};

use super::request::{
    CancellationDecision, GeofenceCheckRequest, PeriodRequest, QuotaCheckRequest,
    QuotaCheckResponse,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Header carrying the acting user's id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the acting user's role.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/recaps/generate", post(generate_recaps_handler))
        .route("/payrolls/generate", post(generate_payrolls_handler))
        .route("/recaps/:id/payroll", post(generate_payroll_handler))
        .route("/payrolls/:id/approve", post(approve_payroll_handler))
        .route("/payrolls/:id/pay", post(pay_payroll_handler))
        .route("/leave/quota-check", post(quota_check_handler))
        .route("/leave/requests", post(submit_leave_handler))
        .route("/leave/requests/:id/approve", post(approve_leave_handler))
        .route("/leave/requests/:id/reject", post(reject_leave_handler))
        .route("/leave/requests/:id/cancel", post(cancel_leave_handler))
        .route(
            "/leave/requests/:id/cancellation-request",
            post(request_cancellation_handler),
        )
        .route(
            "/leave/requests/:id/cancellation",
            post(resolve_cancellation_handler),
        )
        .route("/leave/requests/:id/reschedule", post(reschedule_leave_handler))
        .route("/sessions/claims", post(claim_session_handler))
        .route("/sessions/claims/:id/approve", post(approve_realization_handler))
        .route("/sessions/claims/:id/reject", post(reject_realization_handler))
        .route("/attendance/check-ins", post(check_in_handler))
        .route("/attendance/check-ins/:id/location", post(update_location_handler))
        .route("/geofence/check", post(geofence_check_handler))
        .with_state(state)
}

/// Handler for POST /recaps/generate.
async fn generate_recaps_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();
    info!(correlation_id = %correlation_id, "Processing recap generation request");

    let actor = authorize(
        state.config(),
        &headers,
        Capability::GenerateRecap,
        correlation_id,
    )?;
    let Json(request) = payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "generate_recaps",
        start,
        state.engine().generate_recaps(request.period, &actor),
    )
}

/// Handler for POST /payrolls/generate.
async fn generate_payrolls_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();
    info!(correlation_id = %correlation_id, "Processing payroll generation request");

    let actor = authorize(
        state.config(),
        &headers,
        Capability::GeneratePayroll,
        correlation_id,
    )?;
    let Json(request) = payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "generate_payrolls",
        start,
        state.engine().generate_payrolls(request.period, &actor),
    )
}

/// Handler for POST /recaps/:id/payroll.
async fn generate_payroll_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    recap_id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(
        state.config(),
        &headers,
        Capability::GeneratePayroll,
        correlation_id,
    )?;
    let Path(recap_id) = recap_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;
    info!(
        correlation_id = %correlation_id,
        recap_id = %recap_id,
        "Processing payroll request"
    );

    respond(
        correlation_id,
        "generate_payroll_from_recap",
        start,
        state
            .engine()
            .generate_payroll_from_recap(recap_id, &actor),
    )
}

/// Handler for POST /payrolls/:id/approve.
async fn approve_payroll_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payroll_id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(
        state.config(),
        &headers,
        Capability::ApprovePayroll,
        correlation_id,
    )?;
    let Path(payroll_id) =
        payroll_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "approve_payroll",
        start,
        state.engine().approve_payroll(payroll_id, &actor),
    )
}

/// Handler for POST /payrolls/:id/pay.
async fn pay_payroll_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payroll_id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(
        state.config(),
        &headers,
        Capability::MarkPayrollPaid,
        correlation_id,
    )?;
    let Path(payroll_id) =
        payroll_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "mark_payroll_paid",
        start,
        state.engine().mark_payroll_paid(payroll_id, &actor),
    )
}

/// Handler for POST /leave/quota-check.
///
/// Returns `{"within_quota": true}` or a 422 carrying the current count and
/// limit.
async fn quota_check_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuotaCheckRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();
    let Json(request) = payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    let result = state
        .engine()
        .validate_leave_quota(
            &request.employee_id,
            request.leave_type,
            request.date,
            request.exclude_id,
        )
        .map(|()| QuotaCheckResponse { within_quota: true });
    respond(correlation_id, "validate_leave_quota", start, result)
}

/// Handler for POST /leave/requests.
async fn submit_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LeaveSubmission>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(state.config(), &headers, Capability::SubmitLeave, correlation_id)?;
    let Json(submission) =
        payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "submit_leave",
        start,
        state.engine().submit_leave(submission, &actor),
    )
}

/// Handler for POST /leave/requests/:id/approve.
async fn approve_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    leave_id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(state.config(), &headers, Capability::ApproveLeave, correlation_id)?;
    let Path(leave_id) = leave_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "approve_leave",
        start,
        state.engine().approve_leave(leave_id, &actor),
    )
}

/// Handler for POST /leave/requests/:id/reject.
async fn reject_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    leave_id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(state.config(), &headers, Capability::ApproveLeave, correlation_id)?;
    let Path(leave_id) = leave_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "reject_leave",
        start,
        state.engine().reject_leave(leave_id, &actor),
    )
}

/// Handler for POST /leave/requests/:id/cancel.
async fn cancel_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    leave_id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(state.config(), &headers, Capability::SubmitLeave, correlation_id)?;
    let Path(leave_id) = leave_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "cancel_leave",
        start,
        state.engine().cancel_leave(leave_id, &actor),
    )
}

/// Handler for POST /leave/requests/:id/cancellation-request.
async fn request_cancellation_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    leave_id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(state.config(), &headers, Capability::SubmitLeave, correlation_id)?;
    let Path(leave_id) = leave_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "request_leave_cancellation",
        start,
        state.engine().request_leave_cancellation(leave_id, &actor),
    )
}

/// Handler for POST /leave/requests/:id/cancellation.
///
/// `{"confirm": true}` cancels the leave; `false` reverts it to approved.
async fn resolve_cancellation_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    leave_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CancellationDecision>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(state.config(), &headers, Capability::ApproveLeave, correlation_id)?;
    let Path(leave_id) = leave_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;
    let Json(decision) = payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "resolve_leave_cancellation",
        start,
        state
            .engine()
            .resolve_leave_cancellation(leave_id, decision.confirm, &actor),
    )
}

/// Handler for POST /leave/requests/:id/reschedule.
async fn reschedule_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    leave_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<LeaveReschedule>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(state.config(), &headers, Capability::SubmitLeave, correlation_id)?;
    let Path(leave_id) = leave_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;
    let Json(change) = payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "reschedule_leave",
        start,
        state.engine().reschedule_leave(leave_id, change, &actor),
    )
}

/// Handler for POST /sessions/claims.
async fn claim_session_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SessionClaim>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(state.config(), &headers, Capability::ClaimSession, correlation_id)?;
    let Json(claim) = payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "claim_session",
        start,
        state.engine().claim_session(claim, &actor),
    )
}

/// Handler for POST /sessions/claims/:id/approve.
async fn approve_realization_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    realization_id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(
        state.config(),
        &headers,
        Capability::ApproveSessionRealization,
        correlation_id,
    )?;
    let Path(realization_id) =
        realization_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "approve_realization",
        start,
        state.engine().approve_realization(realization_id, &actor),
    )
}

/// Handler for POST /sessions/claims/:id/reject.
async fn reject_realization_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    realization_id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(
        state.config(),
        &headers,
        Capability::ApproveSessionRealization,
        correlation_id,
    )?;
    let Path(realization_id) =
        realization_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "reject_realization",
        start,
        state.engine().reject_realization(realization_id, &actor),
    )
}

/// Handler for POST /attendance/check-ins.
async fn check_in_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CheckIn>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(
        state.config(),
        &headers,
        Capability::RecordAttendance,
        correlation_id,
    )?;
    let Json(check_in) = payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "check_in",
        start,
        state.engine().check_in(check_in, &actor),
    )
}

/// Handler for POST /attendance/check-ins/:id/location.
async fn update_location_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    attendance_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<LocationUpdate>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();

    let actor = authorize(
        state.config(),
        &headers,
        Capability::RecordAttendance,
        correlation_id,
    )?;
    let Path(attendance_id) =
        attendance_id.map_err(|rejection| path_rejection(rejection, correlation_id))?;
    let Json(update) = payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "update_location",
        start,
        state.engine().update_location(attendance_id, update, &actor),
    )
}

/// Handler for POST /geofence/check.
async fn geofence_check_handler(
    State(state): State<AppState>,
    payload: Result<Json<GeofenceCheckRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let start = Instant::now();
    let Json(request) = payload.map_err(|rejection| json_rejection(rejection, correlation_id))?;

    respond(
        correlation_id,
        "validate_geofence",
        start,
        state.engine().validate_geofence(
            request.observed,
            request.reference,
            request.radius_min,
            request.radius_max,
        ),
    )
}

/// Serializes a successful engine result, or maps its error to a response.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    start: Instant,
    result: EngineResult<T>,
) -> HandlerResult {
    let body = result.map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            operation,
            error = %err,
            "Request failed"
        );
        ApiErrorResponse::from(err)
    })?;

    info!(
        correlation_id = %correlation_id,
        operation,
        duration_us = start.elapsed().as_micros(),
        "Request completed"
    );
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response())
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Resolves the acting user from request headers and the policy table.
fn resolve_actor(
    config: &ConfigLoader,
    headers: &HeaderMap,
    correlation_id: Uuid,
) -> Result<Actor, ApiErrorResponse> {
    let unauthorized = |message: String| {
        warn!(correlation_id = %correlation_id, error = %message, "Actor rejected");
        ApiErrorResponse {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::missing_actor(message),
        }
    };

    let id = header_value(headers, ACTOR_ID_HEADER)
        .ok_or_else(|| unauthorized(format!("missing header: {}", ACTOR_ID_HEADER)))?;
    let role_name = header_value(headers, ACTOR_ROLE_HEADER)
        .ok_or_else(|| unauthorized(format!("missing header: {}", ACTOR_ROLE_HEADER)))?;
    let role: Role = serde_json::from_value(serde_json::Value::String(role_name.to_string()))
        .map_err(|_| unauthorized(format!("unknown role: {}", role_name)))?;

    Ok(config.resolve_actor(id, role))
}

/// Resolves the acting user and checks it holds `capability`.
fn authorize(
    config: &ConfigLoader,
    headers: &HeaderMap,
    capability: Capability,
    correlation_id: Uuid,
) -> Result<Actor, ApiErrorResponse> {
    let actor = resolve_actor(config, headers, correlation_id)?;
    actor.require(capability).map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            actor_id = %actor.id,
            error = %err,
            "Actor lacks capability"
        );
        ApiErrorResponse::from(err)
    })?;
    Ok(actor)
}

fn json_rejection(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's field-level message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::new("VALIDATION_ERROR", body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn path_rejection(rejection: PathRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let message = rejection.body_text();
    warn!(correlation_id = %correlation_id, error = %message, "Invalid path parameter");
    ApiErrorResponse::bad_request(ApiError::new("INVALID_ID", message))
}
