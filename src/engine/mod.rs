//! Orchestration flows over the store.
//!
//! Each flow reads raw records through the [`HrStore`] collaborators, runs
//! the pure functions in [`crate::calculation`], and finishes with a single
//! atomic store write. The acting user is always passed in explicitly; the
//! caller has already checked it holds the capability the flow needs, and
//! the engine only stamps it on records and enforces ownership.

mod attendance;
mod leave;
mod payroll;
mod recap;
mod sessions;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::Employee;
use crate::store::{Directory, HrStore};

pub use attendance::{CheckIn, LocationUpdate};
pub use leave::{LeaveReschedule, LeaveSubmission};
pub use payroll::PayrollGeneration;
pub use sessions::SessionClaim;

/// The result of one employee's step in a batch run.
///
/// A failure aborts only that employee's work; the batch carries on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EmployeeOutcome<T> {
    /// The employee's record was written.
    Generated {
        /// The employee processed.
        employee_id: String,
        /// The stored record.
        record: T,
    },
    /// The employee's step failed and nothing was written for them.
    Failed {
        /// The employee processed.
        employee_id: String,
        /// Machine-readable error code.
        code: String,
        /// Human-readable error message.
        message: String,
    },
}

impl<T> EmployeeOutcome<T> {
    fn from_result(employee_id: String, result: EngineResult<T>) -> Self {
        match result {
            Ok(record) => EmployeeOutcome::Generated {
                employee_id,
                record,
            },
            Err(error) => EmployeeOutcome::Failed {
                employee_id,
                code: error.code().to_string(),
                message: error.to_string(),
            },
        }
    }

    /// Returns the stored record if this step succeeded.
    pub fn record(&self) -> Option<&T> {
        match self {
            EmployeeOutcome::Generated { record, .. } => Some(record),
            EmployeeOutcome::Failed { .. } => None,
        }
    }

    /// Returns the employee this outcome is for.
    pub fn employee_id(&self) -> &str {
        match self {
            EmployeeOutcome::Generated { employee_id, .. }
            | EmployeeOutcome::Failed { employee_id, .. } => employee_id,
        }
    }
}

/// The payroll engine: configuration plus a store.
///
/// Cheap to clone; both halves are shared.
#[derive(Clone)]
pub struct PayrollEngine {
    config: Arc<ConfigLoader>,
    store: Arc<dyn HrStore>,
}

impl PayrollEngine {
    /// Creates an engine over the given configuration and store.
    pub fn new(config: Arc<ConfigLoader>, store: Arc<dyn HrStore>) -> Self {
        Self { config, store }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &dyn HrStore {
        self.store.as_ref()
    }

    fn employee(&self, id: &str) -> EngineResult<Employee> {
        self.store
            .get_employee(id)?
            .ok_or_else(|| EngineError::not_found("employee", id))
    }
}
