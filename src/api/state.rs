//! Application state for the payroll engine API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::engine::PayrollEngine;
use crate::store::HrStore;

/// Shared application state.
///
/// Holds the engine, which in turn shares the loaded configuration and the
/// store across all request handlers.
#[derive(Clone)]
pub struct AppState {
    engine: PayrollEngine,
}

impl AppState {
    /// Creates a new application state over a configuration and store.
    pub fn new(config: ConfigLoader, store: Arc<dyn HrStore>) -> Self {
        Self {
            engine: PayrollEngine::new(Arc::new(config), store),
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &PayrollEngine {
        &self.engine
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        self.engine.config()
    }
}
