//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, Employee, EmployeeCategory, Role};

use super::types::{
    AttendanceRules, EngineConfig, GeofenceDefaults, LeaveRules, PayrollRules, PolicyConfig,
    QuotaRule,
};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── payroll.yaml     # Leave deduction rates
/// ├── leave.yaml       # Personal-leave quotas by category
/// ├── attendance.yaml  # Geofence reference and radius
/// └── policy.yaml      # Role to capability table
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Outer radius: {}m", loader.geofence().radius_max_m);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any file is missing, contains invalid YAML, or
    /// holds values that are inconsistent (e.g. inner radius above outer).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let payroll = Self::load_yaml::<PayrollRules>(&path.join("payroll.yaml"))?;
        let leave = Self::load_yaml::<LeaveRules>(&path.join("leave.yaml"))?;
        let attendance_path = path.join("attendance.yaml");
        let attendance = Self::load_yaml::<AttendanceRules>(&attendance_path)?;
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;

        let geofence = attendance.geofence;
        if geofence.radius_min_m < 0.0 || geofence.radius_min_m > geofence.radius_max_m {
            return Err(EngineError::ConfigParseError {
                path: attendance_path.display().to_string(),
                message: format!(
                    "radius_min_m ({}) must be between 0 and radius_max_m ({})",
                    geofence.radius_min_m, geofence.radius_max_m
                ),
            });
        }

        Ok(Self::from_config(EngineConfig {
            payroll,
            leave,
            attendance,
            policy,
        }))
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the payroll rules.
    pub fn payroll(&self) -> &PayrollRules {
        &self.config.payroll
    }

    /// Returns the geofence defaults.
    pub fn geofence(&self) -> &GeofenceDefaults {
        &self.config.attendance.geofence
    }

    /// Gets the personal-leave quota for a category, if it has one.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::ConfigLoader;
    /// use payroll_engine::models::{EmployeeCategory, QuotaWindow};
    ///
    /// let loader = ConfigLoader::default();
    /// let quota = loader.personal_leave_quota(EmployeeCategory::FixedTerm).unwrap();
    /// assert_eq!(quota.limit, 2);
    /// assert_eq!(quota.window, QuotaWindow::Month);
    /// assert!(loader.personal_leave_quota(EmployeeCategory::Freelance).is_none());
    /// ```
    pub fn personal_leave_quota(&self, category: EmployeeCategory) -> Option<QuotaRule> {
        self.config
            .leave
            .personal_leave_quotas
            .get(&category)
            .copied()
    }

    /// Gets the per-day leave deduction for an employee's contract subtype.
    pub fn leave_deduction_per_day(&self, employee: &Employee) -> Decimal {
        let rates = &self.config.payroll.leave_deduction;
        if employee.is_part_time() {
            rates.per_day_part_time
        } else {
            rates.per_day_full_time
        }
    }

    /// Resolves an actor from the role policy table.
    ///
    /// A role missing from the table resolves to an actor with no capabilities.
    pub fn resolve_actor(&self, id: impl Into<String>, role: Role) -> Actor {
        let capabilities = self
            .config
            .policy
            .roles
            .get(&role)
            .cloned()
            .unwrap_or_default();
        Actor::new(id, role, capabilities)
    }
}
