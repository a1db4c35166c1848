//! Repository for the `availability` table.

use chrono::NaiveDate;
use rooster_core::availability::{blocks_scheduling, AvailabilityStatus};
use rooster_core::types::{DbId, EnumId};
use sqlx::{Executor, PgPool, Postgres};

use crate::models::availability::{Availability, AvailabilityChange, UpsertAvailability};

const COLUMNS: &str = "id, employee_id, company_id, date, status, notes, created_at, updated_at";

pub struct AvailabilityRepo;

impl AvailabilityRepo {
    /// Insert or overwrite the record for `(employee_id, date)`.
    pub async fn upsert<'e, E>(
        executor: E,
        input: &UpsertAvailability,
    ) -> Result<Availability, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "INSERT INTO availability (employee_id, company_id, date, status, notes)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_availability_employee_date DO UPDATE SET
                status = EXCLUDED.status,
                notes = EXCLUDED.notes
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Availability>(&query)
            .bind(input.employee_id)
            .bind(input.company_id)
            .bind(input.date)
            .bind(EnumId::from(input.status))
            .bind(&input.notes)
            .fetch_one(executor)
            .await
    }

    /// Remove the record for one day, returning the day to "unset".
    pub async fn delete_for_date<'e, E>(
        executor: E,
        employee_id: DbId,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM availability WHERE employee_id = $1 AND date = $2")
            .bind(employee_id)
            .bind(date)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a batch of day changes for one employee in a single transaction.
    /// Either every day is written or none is.
    pub async fn apply_days(
        pool: &PgPool,
        employee_id: DbId,
        company_id: DbId,
        changes: &[AvailabilityChange],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        for change in changes {
            match change.status {
                Some(status) => {
                    Self::upsert(
                        &mut *tx,
                        &UpsertAvailability {
                            employee_id,
                            company_id,
                            date: change.date,
                            status,
                            notes: change.notes.clone(),
                        },
                    )
                    .await?;
                }
                None => {
                    Self::delete_for_date(&mut *tx, employee_id, change.date).await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_for_date(
        pool: &PgPool,
        employee_id: DbId,
        date: NaiveDate,
    ) -> Result<Option<Availability>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM availability WHERE employee_id = $1 AND date = $2");
        sqlx::query_as::<_, Availability>(&query)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    /// Records of a company between two dates (inclusive), optionally for one
    /// employee, ordered by date.
    pub async fn list_in_range(
        pool: &PgPool,
        company_id: DbId,
        first: NaiveDate,
        last: NaiveDate,
        employee_id: Option<DbId>,
    ) -> Result<Vec<Availability>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM availability
             WHERE company_id = $1
               AND date BETWEEN $2 AND $3
               AND ($4::BIGINT IS NULL OR employee_id = $4)
             ORDER BY date, employee_id"
        );
        sqlx::query_as::<_, Availability>(&query)
            .bind(company_id)
            .bind(first)
            .bind(last)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of company employees whose record on `date` blocks scheduling.
    pub async fn blocked_employee_ids(
        pool: &PgPool,
        company_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT employee_id FROM availability
             WHERE company_id = $1 AND date = $2 AND status = ANY($3)",
        )
        .bind(company_id)
        .bind(date)
        .bind(
            AvailabilityStatus::ALL
                .iter()
                .copied()
                .filter(|s| blocks_scheduling(*s))
                .map(EnumId::from)
                .collect::<Vec<_>>(),
        )
        .fetch_all(pool)
        .await
    }
}
