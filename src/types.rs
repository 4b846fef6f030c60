//! Core domain types for org-reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Declares an `i64`-backed identifier newtype that binds directly in sqlx queries.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Get the inner i64 value
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
                sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let id = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                Ok(Self(id))
            }
        }
    };
}

id_type!(
    /// Unique identifier for an organization
    OrganizationId
);
id_type!(
    /// Unique identifier for a user account
    UserId
);
id_type!(
    /// Unique identifier for a membership record
    MemberId
);
id_type!(
    /// Unique identifier for a category
    CategoryId
);
id_type!(
    /// Unique identifier for a post (offer or inquiry)
    PostId
);
id_type!(
    /// Unique identifier for a transfer
    TransferId
);

/// Tenant that owns members, posts and transfers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Organization {
    /// Organization ID
    pub id: OrganizationId,
    /// Display name, used in report titles and download filenames
    pub name: String,
}

/// A user's membership within one organization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Member {
    /// Membership ID
    pub id: MemberId,
    /// Organization this membership belongs to
    pub organization_id: OrganizationId,
    /// The user holding the membership
    pub user_id: UserId,
    /// Member number within the organization
    pub member_uid: i64,
    /// User display name
    pub username: String,
    /// User email
    pub email: String,
    /// Primary phone number
    pub phone: Option<String>,
    /// Alternative phone number
    pub alt_phone: Option<String>,
    /// Whether the membership is active
    pub active: bool,
    /// Time balance in seconds (incoming minus outgoing transfers)
    pub balance_secs: i64,
}

/// Post category
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Category {
    /// Category ID
    pub id: CategoryId,
    /// Category name
    pub name: String,
}

/// Post subtype
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    /// Something a member offers to do
    Offer,
    /// Something a member is asking for
    Inquiry,
}

impl PostKind {
    /// All post kinds, in archive order
    pub const ALL: [PostKind; 2] = [PostKind::Inquiry, PostKind::Offer];

    /// Parse a request parameter such as `offer`, `Offers` or `inquiry`
    ///
    /// Returns `None` for anything that is not a known post kind.
    pub fn from_param(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "offer" | "offers" => Some(PostKind::Offer),
            "inquiry" | "inquiries" => Some(PostKind::Inquiry),
            _ => None,
        }
    }

    /// Value stored in the `posts.kind` column
    pub fn as_db_str(&self) -> &'static str {
        match self {
            PostKind::Offer => "offer",
            PostKind::Inquiry => "inquiry",
        }
    }

    /// Plural label used in titles and archive entry names
    pub fn plural_label(&self) -> &'static str {
        match self {
            PostKind::Offer => "Offers",
            PostKind::Inquiry => "Inquiries",
        }
    }
}

/// The member who authored a post
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostAuthor {
    /// Membership ID
    pub member_id: MemberId,
    /// Member number within the organization
    pub member_uid: i64,
    /// User display name
    pub username: String,
}

/// An offer or inquiry published by a member
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Post {
    /// Post ID
    pub id: PostId,
    /// Organization the post was published in
    pub organization_id: OrganizationId,
    /// Post subtype
    pub kind: PostKind,
    /// Title
    pub title: String,
    /// Free-form description
    pub description: Option<String>,
    /// Tags, in the order they were entered
    pub tags: Vec<String>,
    /// Author
    pub author: PostAuthor,
    /// Category the post is filed under
    pub category: Category,
}

/// One side of a transfer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransferParty {
    /// A member's account
    Member {
        /// Member number within the organization
        member_uid: i64,
        /// User display name
        username: String,
    },
    /// The organization's own account
    Organization {
        /// Organization name
        name: String,
    },
}

impl std::fmt::Display for TransferParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferParty::Member {
                member_uid,
                username,
            } => write!(f, "{} ({})", username, member_uid),
            TransferParty::Organization { name } => write!(f, "{}", name),
        }
    }
}

/// A transfer of time between two accounts of an organization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transfer {
    /// Transfer ID
    pub id: TransferId,
    /// Organization the transfer belongs to
    pub organization_id: OrganizationId,
    /// Account the time was taken from
    pub source: TransferParty,
    /// Account the time was given to
    pub destination: TransferParty,
    /// Amount of time in seconds
    pub amount_secs: i64,
    /// Optional reason given for the transfer
    pub reason: Option<String>,
    /// When the transfer was made
    pub created_at: DateTime<Utc>,
}

/// The authenticated member on whose behalf a request runs
///
/// Resolved from the request's API key; every report is scoped to
/// `organization_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    /// Membership the API key was issued for
    pub member_id: MemberId,
    /// Organization the membership belongs to
    pub organization_id: OrganizationId,
    /// User display name
    pub username: String,
}
