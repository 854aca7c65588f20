//! Credential repository backed by `PostgreSQL`.
//!
//! Customers live in `shop.customer` and admins in `shop.admin_user`. The two
//! tables share a shape, so every query is parameterized on the table name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use minishop_core::{AccountId, Email, PrincipalKind};

use super::{CredentialRepository, RepositoryError, map_unique_violation};
use crate::models::{Account, NewAccount, StoredCredential};

const fn table(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Customer => "shop.customer",
        PrincipalKind::Admin => "shop.admin_user",
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i32,
    username: String,
    email: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_credential(self, kind: PrincipalKind) -> Result<StoredCredential, RepositoryError> {
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .map(|e| Email::parse(&e))
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(StoredCredential {
            account: Account {
                kind,
                id: AccountId::new(self.id),
                username: self.username,
                email,
                created_at: self.created_at,
            },
            password_hash: self.password_hash,
        })
    }
}

/// Repository for customer and admin credentials.
#[derive(Debug, Clone)]
pub struct PgCredentialRepository {
    pool: PgPool,
}

impl PgCredentialRepository {
    /// Create a new credential repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for PgCredentialRepository {
    async fn find_by_username(
        &self,
        kind: PrincipalKind,
        username: &str,
    ) -> Result<Option<StoredCredential>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT id, username, email, password_hash, created_at FROM {} WHERE username = $1",
            table(kind)
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credential(kind)).transpose()
    }

    async fn email_exists(
        &self,
        kind: PrincipalKind,
        email: &Email,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE email = $1)",
            table(kind)
        ))
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(
        &self,
        kind: PrincipalKind,
        new: NewAccount,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r"
            INSERT INTO {} (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            ",
            table(kind)
        ))
        .bind(&new.username)
        .bind(new.email.as_ref().map(Email::as_str))
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(row.into_credential(kind)?.account)
    }

    async fn list(&self, kind: PrincipalKind) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT id, username, email, password_hash, created_at FROM {} ORDER BY id",
            table(kind)
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| r.into_credential(kind).map(|c| c.account))
            .collect()
    }
}
