//! State shared across the server.

use crate::catalog::CatalogCourse;
use std::time::Duration;

/// Default time allowed for one generation request.
pub const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a request handler needs.
pub struct AppState {
    /// Catalog loaded at startup
    pub catalog: Vec<CatalogCourse>,
    /// How long a single `/generate` search may run
    pub generate_timeout: Duration,
}

impl AppState {
    pub fn new(catalog: Vec<CatalogCourse>) -> Self {
        Self {
            catalog,
            generate_timeout: DEFAULT_GENERATE_TIMEOUT,
        }
    }

    /// Overrides the per-request search timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = timeout;
        self
    }
}
