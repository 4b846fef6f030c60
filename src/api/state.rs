//! Application state for the API server

use crate::archive::{ArchiveBuilder, ZipArchiveBuilder};
use crate::config::Config;
use crate::db::Database;
use crate::report::RenderOptions;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// Database the reports are read from
    pub db: Arc<Database>,

    /// Configuration (read-only)
    pub config: Arc<Config>,

    /// Builder used for the bundled export
    pub archiver: Arc<dyn ArchiveBuilder>,
}

impl AppState {
    /// Create a new AppState that bundles exports as ZIP
    pub fn new(db: Arc<Database>, config: Arc<Config>) -> Self {
        Self {
            db,
            config,
            archiver: Arc::new(ZipArchiveBuilder),
        }
    }

    /// Replace the archive builder
    pub fn with_archiver(mut self, archiver: Arc<dyn ArchiveBuilder>) -> Self {
        self.archiver = archiver;
        self
    }

    /// Rendering options derived from the report configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from(&self.config.reports)
    }
}
