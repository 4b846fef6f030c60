//! Database layer for org-reports
//!
//! Handles SQLite persistence for organizations, members, posts, transfers
//! and API tokens.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] - Database lifecycle, schema migrations
//! - [`organizations`] - Organizations, users and categories
//! - [`members`] - Membership records and the active-member query
//! - [`posts`] - Offers/inquiries and the active-author query
//! - [`transfers`] - Transfers between accounts
//! - [`tokens`] - API token issuing and resolution

use crate::error::{DatabaseError, Error, Result};
use crate::types::{
    Category, CategoryId, Member, MemberId, OrganizationId, Post, PostAuthor, PostId, PostKind,
    Transfer, TransferId, TransferParty, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, sqlite::SqlitePool};

mod members;
mod migrations;
mod organizations;
mod posts;
mod tokens;
mod transfers;

/// New user to be inserted into the database
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Primary phone number
    pub phone: Option<String>,
    /// Alternative phone number
    pub alt_phone: Option<String>,
}

/// New membership to be inserted into the database
#[derive(Debug, Clone)]
pub struct NewMember {
    /// Organization the membership belongs to
    pub organization_id: OrganizationId,
    /// User holding the membership
    pub user_id: UserId,
    /// Member number within the organization
    pub member_uid: i64,
    /// Whether the membership is active
    pub active: bool,
}

/// New post to be inserted into the database
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Organization the post is published in
    pub organization_id: OrganizationId,
    /// Authoring membership
    pub member_id: MemberId,
    /// Category
    pub category_id: CategoryId,
    /// Offer or inquiry
    pub kind: PostKind,
    /// Title
    pub title: String,
    /// Free-form description
    pub description: Option<String>,
    /// Tags
    pub tags: Vec<String>,
}

/// New transfer to be inserted into the database
///
/// A `None` member on either side means the organization's own account.
#[derive(Debug, Clone)]
pub struct NewTransfer {
    /// Organization the transfer belongs to
    pub organization_id: OrganizationId,
    /// Paying member (None = organization)
    pub source_member_id: Option<MemberId>,
    /// Receiving member (None = organization)
    pub destination_member_id: Option<MemberId>,
    /// Amount of time in seconds
    pub amount_secs: i64,
    /// Optional reason
    pub reason: Option<String>,
    /// Unix timestamp of the transfer
    pub created_at: i64,
}

/// Member record joined with its user (raw from SQLite)
#[derive(Debug, Clone, FromRow)]
pub(crate) struct MemberRow {
    pub id: i64,
    pub organization_id: i64,
    pub user_id: i64,
    pub member_uid: i64,
    pub active: bool,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub alt_phone: Option<String>,
    pub balance_secs: i64,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member {
            id: MemberId(row.id),
            organization_id: OrganizationId(row.organization_id),
            user_id: UserId(row.user_id),
            member_uid: row.member_uid,
            username: row.username,
            email: row.email,
            phone: row.phone,
            alt_phone: row.alt_phone,
            active: row.active,
            balance_secs: row.balance_secs,
        }
    }
}

/// Post record joined with author and category (raw from SQLite)
#[derive(Debug, Clone, FromRow)]
pub(crate) struct PostRow {
    pub id: i64,
    pub organization_id: i64,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: String,
    pub member_id: i64,
    pub member_uid: i64,
    pub username: String,
    pub category_id: i64,
    pub category_name: String,
}

impl TryFrom<PostRow> for Post {
    type Error = Error;

    fn try_from(row: PostRow) -> Result<Self> {
        let kind = PostKind::from_param(&row.kind).ok_or_else(|| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "post {} has unknown kind '{}'",
                row.id, row.kind
            )))
        })?;
        let tags: Vec<String> = serde_json::from_str(&row.tags)?;

        Ok(Post {
            id: PostId(row.id),
            organization_id: OrganizationId(row.organization_id),
            kind,
            title: row.title,
            description: row.description,
            tags,
            author: PostAuthor {
                member_id: MemberId(row.member_id),
                member_uid: row.member_uid,
                username: row.username,
            },
            category: Category {
                id: CategoryId(row.category_id),
                name: row.category_name,
            },
        })
    }
}

/// Transfer record joined with both parties (raw from SQLite)
#[derive(Debug, Clone, FromRow)]
pub(crate) struct TransferRow {
    pub id: i64,
    pub organization_id: i64,
    pub organization_name: String,
    pub amount_secs: i64,
    pub reason: Option<String>,
    pub created_at: i64,
    pub source_member_uid: Option<i64>,
    pub source_username: Option<String>,
    pub destination_member_uid: Option<i64>,
    pub destination_username: Option<String>,
}

fn transfer_party(
    member_uid: Option<i64>,
    username: Option<String>,
    organization_name: &str,
) -> TransferParty {
    match (member_uid, username) {
        (Some(member_uid), Some(username)) => TransferParty::Member {
            member_uid,
            username,
        },
        _ => TransferParty::Organization {
            name: organization_name.to_string(),
        },
    }
}

impl From<TransferRow> for Transfer {
    fn from(row: TransferRow) -> Self {
        let source = transfer_party(
            row.source_member_uid,
            row.source_username,
            &row.organization_name,
        );
        let destination = transfer_party(
            row.destination_member_uid,
            row.destination_username,
            &row.organization_name,
        );

        Transfer {
            id: TransferId(row.id),
            organization_id: OrganizationId(row.organization_id),
            source,
            destination,
            amount_secs: row.amount_secs,
            reason: row.reason,
            created_at: DateTime::<Utc>::from_timestamp(row.created_at, 0).unwrap_or_default(),
        }
    }
}

/// Database handle for org-reports
pub struct Database {
    pool: SqlitePool,
}

/// Map a failed insert onto the error callers can act on
///
/// Unique and foreign-key failures become [`DatabaseError::ConstraintViolation`];
/// anything else is passed through unchanged.
fn insert_error(e: sqlx::Error) -> Error {
    match &e {
        sqlx::Error::Database(db_err)
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
        {
            Error::Database(DatabaseError::ConstraintViolation(
                db_err.message().to_string(),
            ))
        }
        _ => Error::Sqlx(e),
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
