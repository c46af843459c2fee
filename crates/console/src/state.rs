//! Application state shared across handlers.

use std::sync::Arc;

use crate::commerce::{Commerce, RestCommerce};
use crate::config::ConsoleConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the commerce platform client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ConsoleConfig,
    commerce: Arc<dyn Commerce>,
}

impl AppState {
    /// Create the application state with the production commerce client.
    #[must_use]
    pub fn new(config: ConsoleConfig) -> Self {
        let commerce = Arc::new(RestCommerce::new(&config.commerce));
        Self::with_commerce(config, commerce)
    }

    /// Create the application state with an explicit commerce implementation.
    ///
    /// Tests use this to run the full router against an in-memory platform.
    #[must_use]
    pub fn with_commerce(config: ConsoleConfig, commerce: Arc<dyn Commerce>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, commerce }),
        }
    }

    /// Get a reference to the console configuration.
    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce platform client.
    #[must_use]
    pub fn commerce(&self) -> &dyn Commerce {
        self.inner.commerce.as_ref()
    }
}
