//! The acting user and the capabilities they hold.
//!
//! An [`Actor`] is resolved once per request at the boundary (from the role
//! policy table), checked against the capability the operation needs there,
//! and passed explicitly into every operation that stamps an approver or
//! creator or that only the owning employee may perform.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An operation an actor may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Submit, reschedule or cancel one's own leave.
    SubmitLeave,
    /// Approve or reject leave and resolve cancellation requests.
    ApproveLeave,
    /// Claim a work session realization for oneself.
    ClaimSession,
    /// Approve or reject session realizations.
    ApproveSessionRealization,
    /// Record one's own attendance.
    RecordAttendance,
    /// Generate monthly recaps.
    GenerateRecap,
    /// Generate payroll from recaps.
    GeneratePayroll,
    /// Approve a draft payroll.
    ApprovePayroll,
    /// Mark an approved payroll as paid.
    MarkPayrollPaid,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::SubmitLeave => "submit_leave",
            Capability::ApproveLeave => "approve_leave",
            Capability::ClaimSession => "claim_session",
            Capability::ApproveSessionRealization => "approve_session_realization",
            Capability::RecordAttendance => "record_attendance",
            Capability::GenerateRecap => "generate_recap",
            Capability::GeneratePayroll => "generate_payroll",
            Capability::ApprovePayroll => "approve_payroll",
            Capability::MarkPayrollPaid => "mark_payroll_paid",
        })
    }
}

/// A role in the organisation, mapped to capabilities by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular staff.
    Employee,
    /// Team lead approving leave and sessions.
    Supervisor,
    /// HR operator running recaps and payroll.
    HrAdmin,
    /// Finance operator paying out payroll.
    Finance,
}

/// The identity performing an operation, with its resolved capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identifier of the acting user; equals the employee id for staff.
    pub id: String,
    /// The role the capabilities were resolved from.
    pub role: Role,
    /// Capabilities granted to this actor.
    pub capabilities: BTreeSet<Capability>,
}

impl Actor {
    /// Creates an actor with an explicit capability set.
    pub fn new(
        id: impl Into<String>,
        role: Role,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Returns true if the actor holds the capability.
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Fails with [`EngineError::Unauthorized`] unless the actor holds the capability.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Actor, Capability, Role};
    ///
    /// let actor = Actor::new("emp_001", Role::Employee, [Capability::SubmitLeave]);
    /// assert!(actor.require(Capability::SubmitLeave).is_ok());
    /// assert!(actor.require(Capability::ApproveLeave).is_err());
    /// ```
    pub fn require(&self, capability: Capability) -> EngineResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized {
                actor_id: self.id.clone(),
                capability,
            })
        }
    }

    /// Fails with [`EngineError::Unauthorized`] unless the actor is the given
    /// employee; `capability` names the operation in the error.
    pub fn require_owner(&self, employee_id: &str, capability: Capability) -> EngineResult<()> {
        if self.id != employee_id {
            return Err(EngineError::Unauthorized {
                actor_id: self.id.clone(),
                capability,
            });
        }
        Ok(())
    }
}
