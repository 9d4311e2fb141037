//! HTTP API module for the payroll engine.
//!
//! This module exposes the batch recap and payroll operations, the leave,
//! session and attendance workflows, the payroll approval workflow and the
//! two stateless validators over REST. Capability checks happen here; the
//! engine receives an actor that is already authorized.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, create_router};
pub use request::{
    CancellationDecision, GeofenceCheckRequest, PeriodRequest, QuotaCheckRequest,
    QuotaCheckResponse,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
