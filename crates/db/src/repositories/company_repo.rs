//! Repository for the `companies` table.

use rooster_core::company::{
    DEFAULT_ACCENT_COLOR, DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR,
};
use rooster_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CreateCompany, UpdateCompany};

const COLUMNS: &str = "id, name, short_name, primary_color, secondary_color, accent_color, \
                       created_at, updated_at";

pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a company. Missing colours fall back to the default theme.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, short_name, primary_color, secondary_color, accent_color)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.short_name)
            .bind(input.primary_color.as_deref().unwrap_or(DEFAULT_PRIMARY_COLOR))
            .bind(input.secondary_color.as_deref().unwrap_or(DEFAULT_SECONDARY_COLOR))
            .bind(input.accent_color.as_deref().unwrap_or(DEFAULT_ACCENT_COLOR))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All companies, alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies ORDER BY name");
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    /// Apply the non-`None` fields of `input`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = COALESCE($2, name),
                short_name = COALESCE($3, short_name),
                primary_color = COALESCE($4, primary_color),
                secondary_color = COALESCE($5, secondary_color),
                accent_color = COALESCE($6, accent_color)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.short_name)
            .bind(&input.primary_color)
            .bind(&input.secondary_color)
            .bind(&input.accent_color)
            .fetch_optional(pool)
            .await
    }

    /// Delete a company. Fails with `fk_employees_company` while employees
    /// still belong to it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
