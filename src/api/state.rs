//! Application state for the portage simulation API.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the loaded regulatory years and allowance scales. Handlers copy a
/// [`crate::config::SalaryConfiguration`] out of it per request, so no
/// request can alter what another one sees.
#[derive(Clone)]
pub struct AppState {
    /// The loaded configuration directory.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
