//! Repository for the `time_off_requests` table.

use chrono::NaiveDate;
use rooster_core::time_off::TimeOffStatus;
use rooster_core::types::DbId;
use sqlx::{Executor, PgPool, Postgres};

use crate::models::time_off::{
    CreateTimeOff, StatusChange, TimeOffRequest, TimeOffWithEmployee, UpdateTimeOff,
};

const COLUMNS: &str = "id, employee_id, company_id, status, reason, start_date, end_date, \
                       approved_by, created_at, updated_at";

const JOINED_COLUMNS: &str = "t.id, t.employee_id, t.company_id, t.status, t.reason, \
                              t.start_date, t.end_date, t.approved_by, t.created_at, \
                              t.updated_at, e.first_name, e.last_name, e.username";

const JOIN: &str = "FROM time_off_requests t JOIN employees e ON e.id = t.employee_id";

pub struct TimeOffRepo;

impl TimeOffRepo {
    /// Insert a `Pending` request.
    pub async fn create(pool: &PgPool, input: &CreateTimeOff) -> Result<TimeOffRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO time_off_requests (employee_id, company_id, status, reason, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeOffRequest>(&query)
            .bind(input.employee_id)
            .bind(input.company_id)
            .bind(TimeOffStatus::Pending.as_str())
            .bind(&input.reason)
            .bind(input.range.start)
            .bind(input.range.end)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<TimeOffWithEmployee>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} {JOIN} WHERE t.id = $1 AND t.company_id = $2");
        sqlx::query_as::<_, TimeOffWithEmployee>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Requests of a company, newest first, optionally narrowed to one
    /// employee and/or one status.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        employee_id: Option<DbId>,
        status: Option<TimeOffStatus>,
    ) -> Result<Vec<TimeOffWithEmployee>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} {JOIN}
             WHERE t.company_id = $1
               AND ($2::BIGINT IS NULL OR t.employee_id = $2)
               AND ($3::TEXT IS NULL OR t.status = $3)
             ORDER BY t.created_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, TimeOffWithEmployee>(&query)
            .bind(company_id)
            .bind(employee_id)
            .bind(status.map(TimeOffStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Apply requester edits to a request that is still `Pending`.
    ///
    /// Returns `None` if the row is gone or has left `Pending`.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateTimeOff,
    ) -> Result<Option<TimeOffRequest>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "UPDATE time_off_requests SET
                reason = COALESCE($2, reason),
                start_date = COALESCE($3, start_date),
                end_date = COALESCE($4, end_date)
             WHERE id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeOffRequest>(&query)
            .bind(id)
            .bind(&input.reason)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(TimeOffStatus::Pending.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Move a request from `from` to `to`, recording the reviewer.
    ///
    /// The `from` guard makes concurrent reviews lose cleanly: the second
    /// writer gets `None`.
    pub async fn set_status<'e, E>(
        executor: E,
        id: DbId,
        from: TimeOffStatus,
        to: TimeOffStatus,
        approved_by: Option<DbId>,
    ) -> Result<Option<TimeOffRequest>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "UPDATE time_off_requests SET
                status = $3,
                approved_by = COALESCE($4, approved_by)
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeOffRequest>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(approved_by)
            .fetch_optional(executor)
            .await
    }

    /// Apply edits and/or a status change in one transaction.
    ///
    /// Returns `None`, with nothing written, when either guarded statement
    /// finds the row changed underneath it.
    pub async fn revise(
        pool: &PgPool,
        id: DbId,
        edits: Option<&UpdateTimeOff>,
        change: Option<&StatusChange>,
    ) -> Result<Option<TimeOffRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut latest = None;

        if let Some(edits) = edits {
            match Self::update(&mut *tx, id, edits).await? {
                Some(row) => latest = Some(row),
                None => return Ok(None),
            }
        }
        if let Some(change) = change {
            match Self::set_status(&mut *tx, id, change.from, change.to, change.approved_by).await? {
                Some(row) => latest = Some(row),
                None => return Ok(None),
            }
        }

        tx.commit().await?;
        Ok(latest)
    }

    pub async fn delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM time_off_requests WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Approved requests of one employee that touch `[first, last]`.
    pub async fn approved_in_range(
        pool: &PgPool,
        employee_id: DbId,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<TimeOffRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_off_requests
             WHERE employee_id = $1
               AND status = $2
               AND start_date <= $4
               AND end_date >= $3
             ORDER BY start_date"
        );
        sqlx::query_as::<_, TimeOffRequest>(&query)
            .bind(employee_id)
            .bind(TimeOffStatus::Approved.as_str())
            .bind(first)
            .bind(last)
            .fetch_all(pool)
            .await
    }

    /// Ids of company employees with approved time off covering `date`.
    pub async fn employees_on_leave(
        pool: &PgPool,
        company_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT employee_id FROM time_off_requests
             WHERE company_id = $1
               AND status = $2
               AND $3 BETWEEN start_date AND end_date",
        )
        .bind(company_id)
        .bind(TimeOffStatus::Approved.as_str())
        .bind(date)
        .fetch_all(pool)
        .await
    }
}
