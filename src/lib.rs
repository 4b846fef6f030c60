//! # org-reports
//!
//! Report exports for time-bank style organizations: members, offers,
//! inquiries and transfers as CSV or PDF, or all of them bundled in a ZIP.
//!
//! ## Design Philosophy
//!
//! org-reports is designed to be:
//! - **Deterministic** - The same data always renders to the same bytes
//! - **Organization-scoped** - Every export covers exactly one organization
//! - **Library-first** - The HTTP layer is a thin wrapper around plain functions
//!
//! ## Quick Start
//!
//! ```no_run
//! use org_reports::{Config, Database};
//! use org_reports::collection::CollectionProvider;
//! use org_reports::report::{MemberReport, RenderOptions, Report, ReportFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let db = Database::new(config.database_path()).await?;
//!
//!     let organization_id = db.insert_organization("Time Bank").await?;
//!     let organization = db
//!         .get_organization(organization_id)
//!         .await?
//!         .ok_or("organization missing")?;
//!
//!     let members = CollectionProvider::new(&db, &organization).user_list().await?;
//!     let csv = MemberReport::new(&organization, &members)
//!         .run(ReportFormat::Csv, &RenderOptions::default())?;
//!     println!("{}", String::from_utf8_lossy(&csv));
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// ZIP bundle of every report
pub mod archive;
/// Per-report record selection
pub mod collection;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Error types
pub mod error;
/// Report rendering (CSV and PDF)
pub mod report;
/// Core domain types
pub mod types;
/// Utility functions
pub mod utils;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use archive::{ArchiveBuilder, ArchiveEntry, ZipArchiveBuilder};
pub use collection::{CollectionProvider, PostGroups, ReportCollection, ReportKind};
pub use config::Config;
pub use db::Database;
pub use error::{
    ApiError, ArchiveError, DatabaseError, Error, ErrorDetail, ReportError, Result, ToHttpStatus,
};
pub use report::{RenderOptions, RenderedReport, Report, ReportFormat};
pub use types::{
    Category, Member, MemberId, Organization, OrganizationId, Post, PostKind, Principal, Transfer,
    TransferParty,
};

/// Run the API server until a termination signal arrives.
///
/// Opens the configured database, then serves until shutdown.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use org_reports::{Config, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_with_shutdown(Config::default()).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(config: Config) -> Result<()> {
    let db = Database::new(config.database_path()).await?;
    let db = std::sync::Arc::new(db);
    let state = api::AppState::new(db.clone(), std::sync::Arc::new(config));

    api::start_api_server(state).await?;

    // The server has drained; the pool is the last holder
    if let Some(db) = std::sync::Arc::into_inner(db) {
        db.close().await;
    }
    Ok(())
}

#[cfg(unix)]
pub(crate) async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
