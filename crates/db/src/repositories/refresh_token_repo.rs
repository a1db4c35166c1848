//! Repository for the `refresh_tokens` table.

use rooster_core::types::{DbId, Timestamp};
use sqlx::{Executor, PgPool, Postgres};

use crate::models::refresh_token::{CreateRefreshToken, RefreshToken};

const COLUMNS: &str = "id, employee_id, token_hash, expires_at, is_revoked, created_at";

pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateRefreshToken,
    ) -> Result<RefreshToken, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "INSERT INTO refresh_tokens (employee_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(input.employee_id)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .fetch_one(executor)
            .await
    }

    /// Revoke a valid token and return it, in one statement.
    ///
    /// Returns `None` for unknown, revoked, or expired tokens, so each token
    /// can be exchanged at most once.
    pub async fn consume<'e, E>(
        executor: E,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "UPDATE refresh_tokens SET is_revoked = true
             WHERE token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token_hash)
            .fetch_optional(executor)
            .await
    }

    /// Exchange a live token for a new one in a single transaction.
    ///
    /// Returns the new row, or `None` (nothing changed) when `old_hash` is
    /// unknown, revoked, or expired. A failed insert leaves the old token live.
    pub async fn rotate(
        pool: &PgPool,
        old_hash: &str,
        new_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(consumed) = Self::consume(&mut *tx, old_hash).await? else {
            return Ok(None);
        };
        let issued = Self::create(
            &mut *tx,
            &CreateRefreshToken {
                employee_id: consumed.employee_id,
                token_hash: new_hash.to_string(),
                expires_at,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(issued))
    }

    /// Revoke by digest. Returns `true` if a live token was revoked.
    pub async fn revoke_by_hash(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = true
             WHERE token_hash = $1 AND is_revoked = false",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every live token of an employee. Returns the count revoked.
    pub async fn revoke_all_for_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = true
             WHERE employee_id = $1 AND is_revoked = false",
        )
        .bind(employee_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
