//! Report handlers: listing page, single-report exports and the bundled archive.

use super::{PostListQuery, ReportLink, ReportListing, ReportQuery};
use crate::api::AppState;
use crate::archive;
use crate::collection::{CollectionProvider, PostGroups};
use crate::error::{Error, Result};
use crate::report::{self, MemberReport, PostReport, Report, ReportFormat, TransferReport};
use crate::types::{Organization, PostKind, Principal};
use crate::utils::archive_filename;
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::info;

/// Path of the listing page; failed archive downloads redirect here
pub const LISTING_PATH: &str = "/reports";

/// Organization of the authenticated member
async fn load_organization(state: &AppState, principal: &Principal) -> Result<Organization> {
    state
        .db
        .get_organization(principal.organization_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("organization {}", principal.organization_id)))
}

/// Parse the requested format, falling back to the configured default
fn requested_format(state: &AppState, format: Option<&str>) -> Result<ReportFormat> {
    match format.map(str::trim) {
        None | Some("") => Ok(state.config.reports.default_format),
        Some(format) => format.parse(),
    }
}

fn attachment(content_type: &str, filename: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn send_report(state: &AppState, format: ReportFormat, report: &dyn Report) -> Result<Response> {
    let rendered = report::render(format, report, &state.render_options())?;

    info!(
        organization = %report.organization().id,
        report = report.slug(),
        format = %format,
        bytes = rendered.bytes.len(),
        "serving report"
    );

    Ok(attachment(
        rendered.content_type,
        &rendered.filename,
        rendered.bytes,
    ))
}

/// GET /reports - Listing page of available exports
#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    responses(
        (status = 200, description = "Available exports", body = ReportListing),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ApiError),
        (status = 404, description = "Organization not found", body = crate::error::ApiError)
    ),
    security(("api_key" = []))
)]
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ReportListing>> {
    let organization = load_organization(&state, &principal).await?;
    let both = [ReportFormat::Csv, ReportFormat::Pdf];

    Ok(Json(ReportListing {
        organization,
        reports: vec![
            report_link("Members", "/reports/user_list", &both),
            report_link("Offers", "/reports/post_list?type=offer", &both),
            report_link("Inquiries", "/reports/post_list?type=inquiry", &both),
            report_link("Transfers", "/reports/transfer_list", &both),
            report_link("All reports (ZIP)", "/reports/all_list", &[]),
        ],
    }))
}

fn report_link(name: &str, path: &str, formats: &[ReportFormat]) -> ReportLink {
    ReportLink {
        name: name.to_string(),
        path: path.to_string(),
        formats: formats.to_vec(),
    }
}

/// GET /reports/user_list - Export active members
#[utoipa::path(
    get,
    path = "/reports/user_list",
    tag = "reports",
    params(
        ("format" = Option<String>, Query, description = "Output format (csv/pdf)")
    ),
    responses(
        (status = 200, description = "Member report as CSV or PDF attachment"),
        (status = 400, description = "Unsupported format", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    ),
    security(("api_key" = []))
)]
pub async fn user_list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ReportQuery>,
) -> Result<Response> {
    let format = requested_format(&state, query.format.as_deref())?;
    let organization = load_organization(&state, &principal).await?;

    let members = CollectionProvider::new(&state.db, &organization)
        .user_list()
        .await?;

    send_report(&state, format, &MemberReport::new(&organization, &members))
}

/// GET /reports/post_list - Export offers or inquiries grouped by category
#[utoipa::path(
    get,
    path = "/reports/post_list",
    tag = "reports",
    params(
        ("type" = Option<String>, Query, description = "Post type (offer/inquiry), default offer"),
        ("format" = Option<String>, Query, description = "Output format (csv/pdf)")
    ),
    responses(
        (status = 200, description = "Post report as CSV or PDF attachment; empty for unknown types"),
        (status = 400, description = "Unsupported format", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    ),
    security(("api_key" = []))
)]
pub async fn post_list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<PostListQuery>,
) -> Result<Response> {
    let format = requested_format(&state, query.format.as_deref())?;
    let organization = load_organization(&state, &principal).await?;

    let kind = match query.kind.as_deref().map(str::trim) {
        None | Some("") => Some(PostKind::Offer),
        Some(kind) => PostKind::from_param(kind),
    };

    match kind {
        Some(kind) => {
            let groups = CollectionProvider::new(&state.db, &organization)
                .post_list(kind)
                .await?;
            send_report(&state, format, &PostReport::new(&organization, &groups, kind))
        }
        None => {
            tracing::debug!(kind = ?query.kind, "unknown post type, sending empty report");
            let groups = PostGroups::default();
            send_report(&state, format, &PostReport::unknown_kind(&organization, &groups))
        }
    }
}

/// GET /reports/transfer_list - Export every transfer
#[utoipa::path(
    get,
    path = "/reports/transfer_list",
    tag = "reports",
    params(
        ("format" = Option<String>, Query, description = "Output format (csv/pdf)")
    ),
    responses(
        (status = 200, description = "Transfer report as CSV or PDF attachment"),
        (status = 400, description = "Unsupported format", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    ),
    security(("api_key" = []))
)]
pub async fn transfer_list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ReportQuery>,
) -> Result<Response> {
    let format = requested_format(&state, query.format.as_deref())?;
    let organization = load_organization(&state, &principal).await?;

    let transfers = CollectionProvider::new(&state.db, &organization)
        .transfer_list()
        .await?;

    send_report(
        &state,
        format,
        &TransferReport::new(&organization, &transfers),
    )
}

/// GET /reports/all_list - Download every report as CSV files in one ZIP
///
/// Any failure while assembling the archive redirects back to the listing
/// page instead of returning an error body.
#[utoipa::path(
    get,
    path = "/reports/all_list",
    tag = "reports",
    responses(
        (status = 200, description = "ZIP archive with Inquiries.csv, Offers.csv, Member.csv and Transfer.csv", content_type = "application/zip"),
        (status = 302, description = "Archive could not be built; redirect to the listing page"),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ApiError)
    ),
    security(("api_key" = []))
)]
pub async fn all_list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Response {
    let organization = match load_organization(&state, &principal).await {
        Ok(organization) => organization,
        Err(e) => return e.into_response(),
    };

    let options = state.render_options();
    match archive::build_zip(&state.db, state.archiver.as_ref(), &organization, &options).await {
        Ok(bytes) => {
            let filename = archive_filename(&organization.name, chrono::Utc::now().date_naive());
            info!(
                organization = %organization.id,
                bytes = bytes.len(),
                "serving report archive"
            );
            attachment("application/zip", &filename, bytes)
        }
        Err(e) => {
            tracing::warn!(
                organization = %organization.id,
                error = %e,
                "report archive failed, redirecting to listing"
            );
            (StatusCode::FOUND, [(header::LOCATION, LISTING_PATH)]).into_response()
        }
    }
}
