//! Core data models for the payroll engine.
//!
//! This module contains all the domain records exchanged with the store
//! collaborators and returned to callers.

mod actor;
mod attendance;
mod audit;
mod employee;
mod leave;
mod payroll;
mod period;
mod recap;
mod session;

pub use actor::{Actor, Capability, Role};
pub use attendance::{AttendanceRecord, AttendanceStatus, Coordinate};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use employee::{ContractSubtype, Employee, EmployeeCategory};
pub use leave::{LeaveRequest, LeaveStatus, LeaveType, QuotaWindow};
pub use payroll::{ComponentType, Payroll, PayrollComponent, PayrollStatus};
pub use period::{DateRange, Period};
pub use recap::MonthlyRecap;
pub use session::{
    RealizationSource, RealizationStatus, ResolvedRealization, SessionCategory,
    SessionRealization, WorkSession,
};
