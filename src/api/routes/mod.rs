//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`reports`] - Listing page and report exports
//! - [`system`] - Health and OpenAPI

use crate::report::ReportFormat;
use crate::types::Organization;
use serde::{Deserialize, Serialize};

mod reports;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use reports::*;
pub use system::*;

// ============================================================================
// Query/Response Types (shared across handlers)
// ============================================================================

/// Query parameters for GET /reports/user_list and GET /reports/transfer_list
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReportQuery {
    /// Output format: "csv" or "pdf" (default from configuration)
    pub format: Option<String>,
}

/// Query parameters for GET /reports/post_list
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PostListQuery {
    /// Post type: "offer" or "inquiry" (default: offer)
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Output format: "csv" or "pdf" (default from configuration)
    pub format: Option<String>,
}

/// One downloadable export on the listing page
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReportLink {
    /// Human-readable name
    pub name: String,
    /// Path to request, including any fixed query parameters
    pub path: String,
    /// Formats the export can be requested in
    pub formats: Vec<ReportFormat>,
}

/// Response body for GET /reports
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReportListing {
    /// Organization the reports cover
    pub organization: Organization,
    /// Available exports
    pub reports: Vec<ReportLink>,
}
