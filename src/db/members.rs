//! Membership records.

use crate::types::{Member, MemberId, OrganizationId};
use crate::{Error, Result};

use super::{Database, MemberRow, NewMember, insert_error};

/// Member columns joined with the owning user and the derived balance
const MEMBER_SELECT: &str = r#"
    SELECT m.id, m.organization_id, m.user_id, m.member_uid, m.active,
           u.username, u.email, u.phone, u.alt_phone,
           COALESCE((SELECT SUM(t.amount_secs) FROM transfers t
                     WHERE t.destination_member_id = m.id), 0)
         - COALESCE((SELECT SUM(t.amount_secs) FROM transfers t
                     WHERE t.source_member_id = m.id), 0) AS balance_secs
    FROM members m
    JOIN users u ON u.id = m.user_id
"#;

impl Database {
    /// Insert a membership and return its ID
    pub async fn insert_member(&self, member: &NewMember) -> Result<MemberId> {
        let result = sqlx::query(
            r#"
            INSERT INTO members (organization_id, user_id, member_uid, active, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(member.organization_id)
        .bind(member.user_id)
        .bind(member.member_uid)
        .bind(member.active)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(MemberId(result.last_insert_rowid()))
    }

    /// Activate or deactivate a membership
    ///
    /// Returns `false` if no membership with that ID exists.
    pub async fn set_member_active(&self, id: MemberId, active: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE members SET active = ? WHERE id = ?")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Look up a membership by ID, regardless of its active flag
    pub async fn get_member(&self, id: MemberId) -> Result<Option<Member>> {
        let sql = format!("{MEMBER_SELECT} WHERE m.id = ?");
        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Sqlx)?;

        Ok(row.map(Member::from))
    }

    /// Active members of an organization, ordered by member number
    pub async fn active_members(&self, organization_id: OrganizationId) -> Result<Vec<Member>> {
        let sql = format!(
            "{MEMBER_SELECT} WHERE m.organization_id = ? AND m.active = 1 ORDER BY m.member_uid, m.id"
        );
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Sqlx)?;

        Ok(rows.into_iter().map(Member::from).collect())
    }
}
