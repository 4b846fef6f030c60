//! API token issuing and resolution.
//!
//! Only the SHA-256 digest of a token is stored; the plain token is returned
//! once, when it is issued.

use crate::types::{MemberId, OrganizationId, Principal};
use crate::{Error, Result};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::FromRow;

use super::{Database, insert_error};

#[derive(FromRow)]
struct PrincipalRow {
    member_id: i64,
    organization_id: i64,
    username: String,
}

/// Generate a random 256-bit token, hex-encoded
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().r#gen();
    hex::encode(bytes)
}

/// Digest under which a token is stored
pub(crate) fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl Database {
    /// Issue a new API token for a membership
    ///
    /// Returns the plain token. It cannot be recovered later.
    pub async fn issue_api_token(&self, member_id: MemberId) -> Result<String> {
        let token = generate_token();

        sqlx::query("INSERT INTO api_tokens (token_hash, member_id, created_at) VALUES (?, ?, ?)")
            .bind(token_digest(&token))
            .bind(member_id)
            .bind(chrono::Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(insert_error)?;

        Ok(token)
    }

    /// Resolve a token to the member it was issued for
    ///
    /// Returns `None` for unknown tokens and for tokens whose membership is
    /// no longer active.
    pub async fn resolve_api_token(&self, token: &str) -> Result<Option<Principal>> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT m.id AS member_id, m.organization_id, u.username
            FROM api_tokens t
            JOIN members m ON m.id = t.member_id
            JOIN users u ON u.id = m.user_id
            WHERE t.token_hash = ? AND m.active = 1
            "#,
        )
        .bind(token_digest(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Sqlx)?;

        Ok(row.map(|row| Principal {
            member_id: MemberId(row.member_id),
            organization_id: OrganizationId(row.organization_id),
            username: row.username,
        }))
    }

    /// Revoke every token issued for a membership, returning how many were removed
    pub async fn revoke_api_tokens(&self, member_id: MemberId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM api_tokens WHERE member_id = ?")
            .bind(member_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Sqlx)?;

        Ok(result.rows_affected())
    }
}
