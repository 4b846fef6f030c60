//! Transfers between accounts.

use crate::types::{OrganizationId, Transfer, TransferId};
use crate::{Error, Result};

use super::{Database, NewTransfer, TransferRow, insert_error};

impl Database {
    /// Insert a transfer and return its ID
    pub async fn insert_transfer(&self, transfer: &NewTransfer) -> Result<TransferId> {
        let result = sqlx::query(
            r#"
            INSERT INTO transfers (
                organization_id, source_member_id, destination_member_id,
                amount_secs, reason, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transfer.organization_id)
        .bind(transfer.source_member_id)
        .bind(transfer.destination_member_id)
        .bind(transfer.amount_secs)
        .bind(&transfer.reason)
        .bind(transfer.created_at)
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(TransferId(result.last_insert_rowid()))
    }

    /// Every transfer of an organization, oldest first
    pub async fn all_transfers(&self, organization_id: OrganizationId) -> Result<Vec<Transfer>> {
        let rows = sqlx::query_as::<_, TransferRow>(
            r#"
            SELECT t.id, t.organization_id, o.name AS organization_name,
                   t.amount_secs, t.reason, t.created_at,
                   sm.member_uid AS source_member_uid, su.username AS source_username,
                   dm.member_uid AS destination_member_uid, du.username AS destination_username
            FROM transfers t
            JOIN organizations o ON o.id = t.organization_id
            LEFT JOIN members sm ON sm.id = t.source_member_id
            LEFT JOIN users su ON su.id = sm.user_id
            LEFT JOIN members dm ON dm.id = t.destination_member_id
            LEFT JOIN users du ON du.id = dm.user_id
            WHERE t.organization_id = ?
            ORDER BY t.created_at, t.id
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Sqlx)?;

        Ok(rows.into_iter().map(Transfer::from).collect())
    }
}
