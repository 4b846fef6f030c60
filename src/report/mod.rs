//! Report rendering
//!
//! Every report is a pure transform from an already-resolved collection to a
//! [`ReportTable`], which is then encoded as CSV or PDF. Output depends only on
//! the input data, so rendering the same collection twice yields identical
//! bytes.
//!
//! - [`csv`] - CSV encoder
//! - [`pdf`] - PDF encoder
//! - [`MemberReport`], [`PostReport`], [`TransferReport`] - entity reports

use crate::error::{Error, ReportError, Result};
use crate::types::Organization;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

pub mod csv;
mod member;
pub mod pdf;
mod post;
mod transfer;

pub use member::MemberReport;
pub use post::PostReport;
pub use transfer::TransferReport;

/// Export format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Comma-separated values
    #[default]
    Csv,
    /// Portable Document Format
    Pdf,
}

impl ReportFormat {
    /// MIME type sent with the rendered bytes
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv",
            ReportFormat::Pdf => "application/pdf",
        }
    }

    /// File extension for download filenames
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "pdf" => Ok(ReportFormat::Pdf),
            _ => Err(Error::Report(ReportError::UnsupportedFormat {
                format: s.to_string(),
            })),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A block of rows, optionally introduced by a heading (e.g. a category name)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportSection {
    /// Heading printed above the rows
    pub heading: Option<String>,
    /// Data rows; each row has one cell per header
    pub rows: Vec<Vec<String>>,
}

/// Format-independent report content
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportTable {
    /// Document title (PDF only)
    pub title: String,
    /// Column headers
    pub headers: Vec<String>,
    /// Sections in output order
    pub sections: Vec<ReportSection>,
}

impl ReportTable {
    /// Total number of data rows across sections
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

/// Options that affect rendered output
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// PDF body font size in points
    pub pdf_font_size: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { pdf_font_size: 9.0 }
    }
}

impl From<&crate::config::ReportConfig> for RenderOptions {
    fn from(config: &crate::config::ReportConfig) -> Self {
        Self {
            pdf_font_size: config.pdf_font_size,
        }
    }
}

/// A report over one organization's data
pub trait Report {
    /// Filename component identifying the report (e.g. "members")
    fn slug(&self) -> &'static str;

    /// Organization the report is about
    fn organization(&self) -> &Organization;

    /// Build the format-independent content
    fn table(&self) -> ReportTable;

    /// Encode the report in `format`
    fn run(&self, format: ReportFormat, options: &RenderOptions) -> Result<Vec<u8>> {
        let table = self.table();
        match format {
            ReportFormat::Csv => Ok(csv::encode(&table)),
            ReportFormat::Pdf => pdf::encode(
                &table,
                &pdf::PdfOptions {
                    font_size: options.pdf_font_size,
                },
            )
            .map_err(|reason| {
                Error::Report(ReportError::RenderFailed {
                    report: self.slug().to_string(),
                    reason,
                })
            }),
        }
    }
}

/// Rendered report bytes plus response metadata
#[derive(Clone, Debug)]
pub struct RenderedReport {
    /// Encoded report
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`
    pub content_type: &'static str,
    /// Suggested download filename
    pub filename: String,
}

/// Render `report` in `format`, naming the download after today's date
pub fn render(
    format: ReportFormat,
    report: &dyn Report,
    options: &RenderOptions,
) -> Result<RenderedReport> {
    let bytes = report.run(format, options)?;
    let filename = crate::utils::report_filename(
        &report.organization().name,
        report.slug(),
        chrono::Utc::now().date_naive(),
        format.extension(),
    );

    tracing::debug!(
        report = report.slug(),
        format = %format,
        bytes = bytes.len(),
        "rendered report"
    );

    Ok(RenderedReport {
        bytes,
        content_type: format.content_type(),
        filename,
    })
}
