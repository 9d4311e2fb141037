//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load rule configuration from YAML
//! files: leave deduction rates, leave quotas, geofence defaults and the
//! role policy table.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Inner radius: {}m", config.geofence().radius_min_m);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendanceRules, EngineConfig, GeofenceDefaults, LeaveDeductionRates, LeaveRules,
    PayrollRules, PolicyConfig, QuotaRule,
};
