//! Persistence collaborators.
//!
//! The engine reads raw records and writes recaps and payrolls through these
//! traits. Implementations own the unique constraints: a duplicate
//! (employee, date) attendance day, a live duplicate (employee, date) leave
//! request, a duplicate (date, work session) realization claim, and the
//! (employee, period) keys of recaps and payrolls. Upserts are atomic
//! insert-or-update on those keys, never read-check-then-write. Status
//! updates are compare-and-set: the caller names the status it read, and the
//! write fails if the stored row has moved on since.

mod memory;

use thiserror::Error;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{
    AttendanceRecord, DateRange, Employee, LeaveRequest, LeaveStatus, LeaveType, MonthlyRecap,
    Payroll, PayrollStatus, Period, RealizationStatus, ResolvedRealization, SessionRealization,
    WorkSession,
};

pub use memory::InMemoryStore;

/// Errors raised by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write collided with an existing row on a unique key.
    #[error("Unique constraint '{constraint}' violated: {detail}")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: &'static str,
        /// The conflicting key.
        detail: String,
    },

    /// An update targeted a row that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of row.
        entity: &'static str,
        /// The key that was looked up.
        id: String,
    },

    /// A conditional write found the row in another status than expected.
    #[error("{entity} {id} is {current}, cannot become {requested}")]
    StatusChanged {
        /// The kind of row.
        entity: &'static str,
        /// The row's key.
        id: String,
        /// The status actually stored.
        current: String,
        /// The status the write would have set.
        requested: String,
    },

    /// A leave approval would go over its quota.
    #[error("Quota reached: {current} of {limit} already approved")]
    QuotaReached {
        /// Approved days already counted in the window.
        current: u32,
        /// The ceiling for the window.
        limit: u32,
    },

    /// The backend itself failed.
    #[error("Store backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for EngineError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::UniqueViolation { .. } | StoreError::QuotaReached { .. } => {
                EngineError::Conflict {
                    message: error.to_string(),
                }
            }
            StoreError::StatusChanged {
                entity,
                current,
                requested,
                ..
            } => EngineError::InvalidTransition {
                entity: entity.to_string(),
                from: current,
                to: requested,
            },
            StoreError::NotFound { entity, id } => EngineError::NotFound {
                entity: entity.to_string(),
                id,
            },
            StoreError::Backend(message) => EngineError::Store { message },
        }
    }
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Conditions a leave update must still meet when it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveGuard {
    /// The status the caller read the request in.
    pub expected: LeaveStatus,
    /// Quota on the request's leave type, checked without counting the
    /// request itself.
    pub quota: Option<QuotaGuard>,
}

/// A ceiling on approved leave days within a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaGuard {
    /// The window days are counted over.
    pub window: DateRange,
    /// Maximum approved days within the window.
    pub limit: u32,
}

/// The raw rows one employee's recap is built from.
#[derive(Debug, Clone, Default)]
pub struct RecapSources {
    /// Attendance rows in the period, ordered by date.
    pub attendance: Vec<AttendanceRecord>,
    /// Leave requests dated in the period, ordered by date.
    pub leaves: Vec<LeaveRequest>,
    /// Realizations in the period with their work sessions.
    pub realizations: Vec<ResolvedRealization>,
}

/// Read access to the employee directory.
pub trait Directory {
    /// Looks up one employee.
    fn get_employee(&self, id: &str) -> StoreResult<Option<Employee>>;

    /// All active employees, ordered by id.
    fn list_active_employees(&self) -> StoreResult<Vec<Employee>>;
}

/// Attendance rows.
pub trait AttendanceRepository {
    /// An employee's attendance rows within `range`, ordered by date.
    fn find_attendance(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> StoreResult<Vec<AttendanceRecord>>;

    /// Looks up one attendance row.
    fn get_attendance(&self, id: Uuid) -> StoreResult<Option<AttendanceRecord>>;

    /// Inserts a row; fails on a duplicate (employee, date).
    fn insert_attendance(&self, record: AttendanceRecord) -> StoreResult<()>;

    /// Replaces an existing row by id.
    fn update_attendance(&self, record: AttendanceRecord) -> StoreResult<()>;
}

/// Leave requests.
pub trait LeaveRepository {
    /// An employee's leave requests dated within `range`, ordered by date.
    fn find_leave(&self, employee_id: &str, range: DateRange) -> StoreResult<Vec<LeaveRequest>>;

    /// Looks up one leave request.
    fn get_leave(&self, id: Uuid) -> StoreResult<Option<LeaveRequest>>;

    /// Counts approved requests of `leave_type` dated within `range`, leaving
    /// out `exclude_id` if given.
    fn count_approved_leave(
        &self,
        employee_id: &str,
        leave_type: LeaveType,
        range: DateRange,
        exclude_id: Option<Uuid>,
    ) -> StoreResult<u32>;

    /// Inserts a request; fails if the employee already has a live
    /// (not rejected, not cancelled) request on that date.
    fn insert_leave(&self, request: LeaveRequest) -> StoreResult<()>;

    /// Replaces an existing request by id if it is still in
    /// `guard.expected`, re-checking the live-date key and any quota under
    /// the same lock.
    fn update_leave(&self, request: LeaveRequest, guard: LeaveGuard) -> StoreResult<()>;
}

/// Work sessions and realization claims.
pub trait SessionRepository {
    /// Looks up one work session.
    fn get_work_session(&self, id: &str) -> StoreResult<Option<WorkSession>>;

    /// An employee's realizations within `range`, each paired with its work
    /// session if it still resolves, ordered by date.
    fn find_realizations(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> StoreResult<Vec<ResolvedRealization>>;

    /// Looks up one realization.
    fn get_realization(&self, id: Uuid) -> StoreResult<Option<SessionRealization>>;

    /// Inserts a claim; fails on a duplicate (date, work session).
    fn insert_realization(&self, realization: SessionRealization) -> StoreResult<()>;

    /// Replaces an existing realization by id if it is still in `expected`.
    fn update_realization(
        &self,
        realization: SessionRealization,
        expected: RealizationStatus,
    ) -> StoreResult<()>;
}

/// Monthly recaps.
pub trait RecapRepository {
    /// Reads the employee's rows for `period`, builds the recap from them and
    /// stores it, all under one lock. An existing recap for the same
    /// (employee, period) is overwritten keeping its id. Returns the stored
    /// row.
    fn rebuild_recap(
        &self,
        employee_id: &str,
        period: Period,
        build: &dyn Fn(&RecapSources) -> MonthlyRecap,
    ) -> StoreResult<MonthlyRecap>;

    /// Looks up one recap.
    fn get_recap(&self, id: Uuid) -> StoreResult<Option<MonthlyRecap>>;

    /// All recaps of a period, ordered by employee id.
    fn find_recaps(&self, period: Period) -> StoreResult<Vec<MonthlyRecap>>;
}

/// Payrolls and their components.
pub trait PayrollRepository {
    /// Inserts the payroll, or updates the existing one for the same
    /// (employee, period) and replaces its components, keeping its id and
    /// creator. Only a draft may be overwritten. Returns the stored row.
    fn save_payroll(&self, payroll: Payroll) -> StoreResult<Payroll>;

    /// Looks up one payroll.
    fn get_payroll(&self, id: Uuid) -> StoreResult<Option<Payroll>>;

    /// Replaces an existing payroll by id if it is still in `expected`.
    fn update_payroll(&self, payroll: Payroll, expected: PayrollStatus) -> StoreResult<()>;
}

/// Everything the engine needs from persistence.
pub trait HrStore:
    Directory
    + AttendanceRepository
    + LeaveRepository
    + SessionRepository
    + RecapRepository
    + PayrollRepository
    + Send
    + Sync
{
}

impl<T> HrStore for T where
    T: Directory
        + AttendanceRepository
        + LeaveRepository
        + SessionRepository
        + RecapRepository
        + PayrollRepository
        + Send
        + Sync
{
}
