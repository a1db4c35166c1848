//! Refresh token entity model.

use rooster_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `refresh_tokens` table. Only the token's digest is stored.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub employee_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateRefreshToken {
    pub employee_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
