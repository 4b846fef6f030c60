//! Offers and inquiries.

use crate::types::{OrganizationId, Post, PostId, PostKind};
use crate::{Error, Result};

use super::{Database, NewPost, PostRow, insert_error};

impl Database {
    /// Insert a post and return its ID
    pub async fn insert_post(&self, post: &NewPost) -> Result<PostId> {
        let tags = serde_json::to_string(&post.tags)?;

        let result = sqlx::query(
            r#"
            INSERT INTO posts (
                organization_id, member_id, category_id, kind,
                title, description, tags, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(post.organization_id)
        .bind(post.member_id)
        .bind(post.category_id)
        .bind(post.kind.as_db_str())
        .bind(&post.title)
        .bind(&post.description)
        .bind(tags)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(PostId(result.last_insert_rowid()))
    }

    /// Posts of one kind whose author is an active member of the same organization
    ///
    /// The author's activity is evaluated now, not when the post was created.
    /// Results are ordered by post ID.
    pub async fn posts_of_active_members(
        &self,
        organization_id: OrganizationId,
        kind: PostKind,
    ) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.organization_id, p.kind, p.title, p.description, p.tags,
                   m.id AS member_id, m.member_uid, u.username,
                   c.id AS category_id, c.name AS category_name
            FROM posts p
            JOIN members m ON m.id = p.member_id AND m.organization_id = p.organization_id
            JOIN users u ON u.id = m.user_id
            JOIN categories c ON c.id = p.category_id
            WHERE p.organization_id = ? AND p.kind = ? AND m.active = 1
            ORDER BY p.id
            "#,
        )
        .bind(organization_id)
        .bind(kind.as_db_str())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Sqlx)?;

        rows.into_iter().map(Post::try_from).collect()
    }
}
