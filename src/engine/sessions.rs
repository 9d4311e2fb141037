//! Work-session realization claims and their approval.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculation::next_realization_status;
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, Capability, RealizationSource, RealizationStatus, SessionRealization};
use crate::store::SessionRepository;

use super::PayrollEngine;

/// A claim that an employee performed a work session on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaim {
    /// The claiming employee.
    pub employee_id: String,
    /// The work session slot.
    pub work_session_id: String,
    /// The day it was performed.
    pub date: NaiveDate,
    /// Whether the session is part of the regular load or overtime.
    pub source: RealizationSource,
}

impl PayrollEngine {
    /// Records a claim on the actor's own behalf.
    ///
    /// The caller must hold [`Capability::ClaimSession`]. The work session
    /// must exist and be active. Each (date, work session)
    /// slot can be claimed once; of two concurrent claims exactly one
    /// succeeds and the other fails with a conflict.
    pub fn claim_session(
        &self,
        claim: SessionClaim,
        actor: &Actor,
    ) -> EngineResult<SessionRealization> {
        actor.require_owner(&claim.employee_id, Capability::ClaimSession)?;

        let session = self
            .store
            .get_work_session(&claim.work_session_id)?
            .ok_or_else(|| EngineError::not_found("work session", &claim.work_session_id))?;
        if !session.active {
            return Err(EngineError::validation(
                "work_session_id",
                format!("work session '{}' is not active", session.id),
            ));
        }

        let realization = SessionRealization {
            id: Uuid::new_v4(),
            employee_id: claim.employee_id,
            work_session_id: claim.work_session_id,
            date: claim.date,
            status: RealizationStatus::Submitted,
            source: claim.source,
            approver_id: None,
        };
        self.store.insert_realization(realization.clone())?;

        info!(
            realization_id = %realization.id,
            employee_id = %realization.employee_id,
            work_session_id = %realization.work_session_id,
            date = %realization.date,
            "Session claimed"
        );
        Ok(realization)
    }

    /// Approves a submitted claim. The caller must hold
    /// [`Capability::ApproveSessionRealization`].
    pub fn approve_realization(
        &self,
        realization_id: Uuid,
        actor: &Actor,
    ) -> EngineResult<SessionRealization> {
        self.decide_realization(realization_id, RealizationStatus::Approved, actor)
    }

    /// Rejects a submitted claim.
    pub fn reject_realization(
        &self,
        realization_id: Uuid,
        actor: &Actor,
    ) -> EngineResult<SessionRealization> {
        self.decide_realization(realization_id, RealizationStatus::Rejected, actor)
    }

    fn decide_realization(
        &self,
        realization_id: Uuid,
        next: RealizationStatus,
        actor: &Actor,
    ) -> EngineResult<SessionRealization> {
        let mut realization = self
            .store
            .get_realization(realization_id)?
            .ok_or_else(|| EngineError::not_found("session realization", realization_id))?;

        let current = realization.status;
        realization.status = next_realization_status(current, next)?;
        realization.approver_id = Some(actor.id.clone());
        self.store
            .update_realization(realization.clone(), current)?;

        info!(
            realization_id = %realization.id,
            status = %realization.status,
            actor_id = %actor.id,
            "Session realization decided"
        );
        Ok(realization)
    }
}
