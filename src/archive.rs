//! Bundled export of every report as a ZIP archive
//!
//! The archive holds four CSV entries, always in this order:
//! `Inquiries.csv`, `Offers.csv`, `Member.csv`, `Transfer.csv`.
//!
//! Building the archive itself goes through the [`ArchiveBuilder`] trait so
//! callers can swap the container format, and tests can force a failure.

use crate::collection::CollectionProvider;
use crate::db::Database;
use crate::error::{ArchiveError, Error, Result};
use crate::report::{
    MemberReport, PostReport, RenderOptions, Report, ReportFormat, TransferReport,
};
use crate::types::{Organization, PostKind};
use std::io::{Cursor, Write};
use tracing::{debug, warn};

/// A named file inside the archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry filename
    pub name: String,
    /// Entry contents
    pub bytes: Vec<u8>,
}

/// Packs entries into a single archive
///
/// # Examples
///
/// ```
/// use org_reports::archive::{ArchiveBuilder, ArchiveEntry, ZipArchiveBuilder};
///
/// let entries = vec![ArchiveEntry {
///     name: "Member.csv".to_string(),
///     bytes: b"ID,Name\n".to_vec(),
/// }];
/// let bytes = ZipArchiveBuilder.build(&entries).unwrap();
/// assert!(bytes.starts_with(b"PK"));
/// ```
pub trait ArchiveBuilder: Send + Sync {
    /// Build an archive containing `entries` in order
    fn build(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>>;
}

/// In-memory ZIP builder
///
/// Entries are deflated and stamped with a fixed modification time, so the
/// same entries always produce the same archive bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZipArchiveBuilder;

impl ArchiveBuilder for ZipArchiveBuilder {
    fn build(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644);

        for entry in entries {
            writer.start_file(entry.name.as_str(), options).map_err(|e| {
                Error::Archive(ArchiveError::EntryFailed {
                    entry: entry.name.clone(),
                    reason: e.to_string(),
                })
            })?;
            writer.write_all(&entry.bytes).map_err(|e| {
                Error::Archive(ArchiveError::EntryFailed {
                    entry: entry.name.clone(),
                    reason: e.to_string(),
                })
            })?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| Error::Archive(ArchiveError::FinalizeFailed(e.to_string())))?;

        Ok(cursor.into_inner())
    }
}

/// Render the four CSV entries for `organization`
pub async fn archive_entries(
    db: &Database,
    organization: &Organization,
    options: &RenderOptions,
) -> Result<Vec<ArchiveEntry>> {
    let provider = CollectionProvider::new(db, organization);
    let mut entries = Vec::with_capacity(4);

    for kind in PostKind::ALL {
        let groups = provider.post_list(kind).await?;
        let report = PostReport::new(organization, &groups, kind);
        entries.push(ArchiveEntry {
            name: format!("{}.csv", kind.plural_label()),
            bytes: report.run(ReportFormat::Csv, options)?,
        });
    }

    let members = provider.user_list().await?;
    entries.push(ArchiveEntry {
        name: "Member.csv".to_string(),
        bytes: MemberReport::new(organization, &members).run(ReportFormat::Csv, options)?,
    });

    let transfers = provider.transfer_list().await?;
    entries.push(ArchiveEntry {
        name: "Transfer.csv".to_string(),
        bytes: TransferReport::new(organization, &transfers).run(ReportFormat::Csv, options)?,
    });

    Ok(entries)
}

/// Gather, render and pack every report of `organization`
pub async fn build_zip(
    db: &Database,
    builder: &dyn ArchiveBuilder,
    organization: &Organization,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let entries = archive_entries(db, organization, options).await?;

    match builder.build(&entries) {
        Ok(bytes) => {
            debug!(
                organization = %organization.id,
                entries = entries.len(),
                bytes = bytes.len(),
                "built report archive"
            );
            Ok(bytes)
        }
        Err(e) => {
            warn!(organization = %organization.id, error = %e, "failed to build report archive");
            Err(e)
        }
    }
}
