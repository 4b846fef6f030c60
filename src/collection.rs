//! Collection provider
//!
//! Resolves, per report kind, the records of one organization that a report
//! renders: active members, posts by active members grouped by category, or
//! every transfer.

use crate::db::Database;
use crate::error::Result;
use crate::types::{Category, CategoryId, Member, Organization, Post, PostKind, Transfer};
use std::collections::HashMap;
use tracing::debug;

/// Kind of collection a report is built from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    /// Active members
    Member,
    /// Posts of one kind by active members
    Posts(PostKind),
    /// All transfers
    Transfer,
}

impl ReportKind {
    /// Parse a kind name such as `member`, `Offer`, `inquiries` or `transfer`
    ///
    /// Returns `None` for anything else.
    pub fn from_param(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "member" | "members" => Some(ReportKind::Member),
            "transfer" | "transfers" => Some(ReportKind::Transfer),
            other => PostKind::from_param(other).map(ReportKind::Posts),
        }
    }
}

/// Posts grouped by category
///
/// Groups appear in the order their category was first encountered in the
/// input; posts keep their input order within a group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostGroups {
    groups: Vec<(Category, Vec<Post>)>,
}

impl PostGroups {
    /// Group posts by category, preserving discovery order
    pub fn from_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        let mut groups: Vec<(Category, Vec<Post>)> = Vec::new();
        let mut index: HashMap<CategoryId, usize> = HashMap::new();

        for post in posts {
            match index.get(&post.category.id) {
                Some(&position) => groups[position].1.push(post),
                None => {
                    index.insert(post.category.id, groups.len());
                    groups.push((post.category.clone(), vec![post]));
                }
            }
        }

        Self { groups }
    }

    /// The `(category, posts)` groups in discovery order
    pub fn groups(&self) -> &[(Category, Vec<Post>)] {
        &self.groups
    }

    /// Total number of posts across all groups
    pub fn post_count(&self) -> usize {
        self.groups.iter().map(|(_, posts)| posts.len()).sum()
    }

    /// Whether there are no posts at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A resolved collection, ready to be handed to a report
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportCollection {
    /// Active members
    Members(Vec<Member>),
    /// Grouped posts of one kind
    Posts {
        /// Post subtype
        kind: PostKind,
        /// Posts grouped by category
        groups: PostGroups,
    },
    /// Transfers
    Transfers(Vec<Transfer>),
    /// Fallback for unknown report kinds
    Empty,
}

impl ReportCollection {
    /// Number of records in the collection
    pub fn len(&self) -> usize {
        match self {
            ReportCollection::Members(members) => members.len(),
            ReportCollection::Posts { groups, .. } => groups.post_count(),
            ReportCollection::Transfers(transfers) => transfers.len(),
            ReportCollection::Empty => 0,
        }
    }

    /// Whether the collection has no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves report collections for one organization
pub struct CollectionProvider<'a> {
    db: &'a Database,
    organization: &'a Organization,
}

impl<'a> CollectionProvider<'a> {
    /// Create a provider scoped to `organization`
    pub fn new(db: &'a Database, organization: &'a Organization) -> Self {
        Self { db, organization }
    }

    /// The organization every collection is scoped to
    pub fn organization(&self) -> &Organization {
        self.organization
    }

    /// Active members of the organization
    pub async fn user_list(&self) -> Result<Vec<Member>> {
        let members = self.db.active_members(self.organization.id).await?;
        debug!(
            organization = %self.organization.id,
            count = members.len(),
            "resolved member collection"
        );
        Ok(members)
    }

    /// Posts of `kind` by active members, grouped by category
    pub async fn post_list(&self, kind: PostKind) -> Result<PostGroups> {
        let posts = self
            .db
            .posts_of_active_members(self.organization.id, kind)
            .await?;
        let groups = PostGroups::from_posts(posts);
        debug!(
            organization = %self.organization.id,
            kind = kind.as_db_str(),
            categories = groups.groups().len(),
            posts = groups.post_count(),
            "resolved post collection"
        );
        Ok(groups)
    }

    /// Every transfer of the organization
    pub async fn transfer_list(&self) -> Result<Vec<Transfer>> {
        let transfers = self.db.all_transfers(self.organization.id).await?;
        debug!(
            organization = %self.organization.id,
            count = transfers.len(),
            "resolved transfer collection"
        );
        Ok(transfers)
    }

    /// Resolve the collection for a kind name
    ///
    /// Unknown kinds resolve to [`ReportCollection::Empty`] without touching
    /// the database; only query failures produce an error.
    pub async fn return_collection(&self, kind: &str) -> Result<ReportCollection> {
        let Some(kind) = ReportKind::from_param(kind) else {
            debug!(kind, "unknown report kind, returning empty collection");
            return Ok(ReportCollection::Empty);
        };

        self.resolve(kind).await
    }

    /// Resolve the collection for a parsed kind
    pub async fn resolve(&self, kind: ReportKind) -> Result<ReportCollection> {
        Ok(match kind {
            ReportKind::Member => ReportCollection::Members(self.user_list().await?),
            ReportKind::Posts(kind) => ReportCollection::Posts {
                kind,
                groups: self.post_list(kind).await?,
            },
            ReportKind::Transfer => ReportCollection::Transfers(self.transfer_list().await?),
        })
    }
}
