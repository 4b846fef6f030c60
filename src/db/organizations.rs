//! Organizations, users and categories.

use crate::types::{CategoryId, Organization, OrganizationId, UserId};
use crate::{Error, Result};
use sqlx::FromRow;

use super::{Database, NewUser, insert_error};

#[derive(FromRow)]
struct OrganizationRow {
    id: i64,
    name: String,
}

impl Database {
    /// Insert an organization and return its ID
    pub async fn insert_organization(&self, name: &str) -> Result<OrganizationId> {
        let result = sqlx::query("INSERT INTO organizations (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(chrono::Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(Error::Sqlx)?;

        Ok(OrganizationId(result.last_insert_rowid()))
    }

    /// Look up an organization by ID
    pub async fn get_organization(&self, id: OrganizationId) -> Result<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name FROM organizations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Sqlx)?;

        Ok(row.map(|row| Organization {
            id: OrganizationId(row.id),
            name: row.name,
        }))
    }

    /// Insert a user and return its ID
    pub async fn insert_user(&self, user: &NewUser) -> Result<UserId> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, phone, alt_phone, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.alt_phone)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(UserId(result.last_insert_rowid()))
    }

    /// Insert a category, or return the existing one with the same name
    pub async fn insert_category(&self, name: &str) -> Result<CategoryId> {
        sqlx::query("INSERT OR IGNORE INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(Error::Sqlx)?;

        let id: i64 = sqlx::query_scalar("SELECT id FROM categories WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Sqlx)?;

        Ok(CategoryId(id))
    }
}
