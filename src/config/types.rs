//! Configuration types for payroll and validation rules.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Each `Default` impl
//! matches the files shipped under `config/default/`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{Capability, Coordinate, EmployeeCategory, QuotaWindow, Role};

/// Per-day leave deduction amounts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaveDeductionRates {
    /// Deducted per leave day for everyone not on a part-time arrangement.
    pub per_day_full_time: Decimal,
    /// Deducted per leave day for part-time arrangements.
    pub per_day_part_time: Decimal,
}

/// Payroll configuration from payroll.yaml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayrollRules {
    /// Leave deduction rates.
    pub leave_deduction: LeaveDeductionRates,
}

impl Default for PayrollRules {
    fn default() -> Self {
        Self {
            leave_deduction: LeaveDeductionRates {
                per_day_full_time: Decimal::new(100_000, 0),
                per_day_part_time: Decimal::new(50_000, 0),
            },
        }
    }
}

/// A ceiling on approved leave days within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QuotaRule {
    /// Maximum approved days within the window.
    pub limit: u32,
    /// The window the days are counted over.
    pub window: QuotaWindow,
}

/// Leave configuration from leave.yaml.
///
/// Only personal leave is quota-limited; a category without an entry has no
/// quota at all.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaveRules {
    /// Personal-leave quota by employee category.
    #[serde(default)]
    pub personal_leave_quotas: BTreeMap<EmployeeCategory, QuotaRule>,
}

impl Default for LeaveRules {
    fn default() -> Self {
        let mut personal_leave_quotas = BTreeMap::new();
        personal_leave_quotas.insert(
            EmployeeCategory::FixedTerm,
            QuotaRule {
                limit: 2,
                window: QuotaWindow::Month,
            },
        );
        personal_leave_quotas.insert(
            EmployeeCategory::Permanent,
            QuotaRule {
                limit: 12,
                window: QuotaWindow::Year,
            },
        );
        Self {
            personal_leave_quotas,
        }
    }
}

/// Geofence defaults used when a check does not supply its own bounds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeofenceDefaults {
    /// The office coordinate check-ins are measured against.
    pub reference: Coordinate,
    /// Inner radius in meters.
    pub radius_min_m: f64,
    /// Outer radius in meters.
    pub radius_max_m: f64,
}

impl Default for GeofenceDefaults {
    fn default() -> Self {
        Self {
            reference: Coordinate::new(-6.175392, 106.827153),
            radius_min_m: 20.0,
            radius_max_m: 50.0,
        }
    }
}

/// Attendance configuration from attendance.yaml.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct AttendanceRules {
    /// Geofence defaults.
    pub geofence: GeofenceDefaults,
}

/// Role policy table from policy.yaml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicyConfig {
    /// Capabilities granted to each role.
    pub roles: BTreeMap<Role, Vec<Capability>>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        use Capability::*;

        let staff = vec![SubmitLeave, ClaimSession, RecordAttendance];
        let mut supervisor = staff.clone();
        supervisor.extend([ApproveLeave, ApproveSessionRealization]);
        let mut hr_admin = supervisor.clone();
        hr_admin.extend([GenerateRecap, GeneratePayroll, ApprovePayroll]);

        let mut roles = BTreeMap::new();
        roles.insert(Role::Employee, staff);
        roles.insert(Role::Supervisor, supervisor);
        roles.insert(Role::HrAdmin, hr_admin);
        roles.insert(Role::Finance, vec![MarkPayrollPaid]);
        Self { roles }
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    /// Payroll rules.
    pub payroll: PayrollRules,
    /// Leave quota rules.
    pub leave: LeaveRules,
    /// Attendance and geofence rules.
    pub attendance: AttendanceRules,
    /// Role to capability table.
    pub policy: PolicyConfig,
}
