//! Period-end aggregation and payroll computation engine.
//!
//! This crate turns raw daily attendance, leave and work-session realization
//! rows into per-employee monthly recaps, and turns those recaps into payroll
//! records with itemized components. It also carries the leave-quota and GPS
//! geofence validators the aggregation relies on, and the status workflows
//! that gate them.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
