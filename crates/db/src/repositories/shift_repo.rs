//! Repository for the `shifts` table.

use chrono::NaiveDate;
use rooster_core::types::{DbId, EnumId};
use sqlx::PgPool;

use crate::models::shift::{Shift, ShiftInput, ShiftWithEmployee};

const COLUMNS: &str = "id, employee_id, company_id, date, start_time, end_time, shift_type, \
                       is_open_ended, is_standby, notes, created_at, updated_at";

/// Shift columns qualified for joins against `employees e`.
const JOINED_COLUMNS: &str = "s.id, s.employee_id, s.company_id, s.date, s.start_time, \
                              s.end_time, s.shift_type, s.is_open_ended, s.is_standby, s.notes, \
                              s.created_at, s.updated_at, e.first_name, e.last_name, e.username";

const JOIN: &str = "FROM shifts s JOIN employees e ON e.id = s.employee_id";

pub struct ShiftRepo;

impl ShiftRepo {
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &ShiftInput,
    ) -> Result<Shift, sqlx::Error> {
        let query = format!(
            "INSERT INTO shifts
                (employee_id, company_id, date, start_time, end_time, shift_type,
                 is_open_ended, is_standby, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(input.employee_id)
            .bind(company_id)
            .bind(input.date)
            .bind(input.times.start)
            .bind(input.times.end)
            .bind(EnumId::from(input.shift_type))
            .bind(input.times.is_open_ended)
            .bind(input.is_standby)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<ShiftWithEmployee>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} {JOIN} WHERE s.id = $1 AND s.company_id = $2");
        sqlx::query_as::<_, ShiftWithEmployee>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite every writable field. Returns `None` if the shift is not in
    /// `company_id`.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        input: &ShiftInput,
    ) -> Result<Option<Shift>, sqlx::Error> {
        let query = format!(
            "UPDATE shifts SET
                employee_id = $3,
                date = $4,
                start_time = $5,
                end_time = $6,
                shift_type = $7,
                is_open_ended = $8,
                is_standby = $9,
                notes = $10
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(id)
            .bind(company_id)
            .bind(input.employee_id)
            .bind(input.date)
            .bind(input.times.start)
            .bind(input.times.end)
            .bind(EnumId::from(input.shift_type))
            .bind(input.times.is_open_ended)
            .bind(input.is_standby)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Shifts of a company with `first <= date <= last`, optionally for one
    /// employee, ordered by date then start time.
    pub async fn list_in_range(
        pool: &PgPool,
        company_id: DbId,
        first: NaiveDate,
        last: NaiveDate,
        employee_id: Option<DbId>,
    ) -> Result<Vec<ShiftWithEmployee>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} {JOIN}
             WHERE s.company_id = $1
               AND s.date BETWEEN $2 AND $3
               AND ($4::BIGINT IS NULL OR s.employee_id = $4)
             ORDER BY s.date, s.start_time, s.id"
        );
        sqlx::query_as::<_, ShiftWithEmployee>(&query)
            .bind(company_id)
            .bind(first)
            .bind(last)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// Every shift of one employee, optionally from `from` onwards.
    pub async fn list_for_employee(
        pool: &PgPool,
        company_id: DbId,
        employee_id: DbId,
        from: Option<NaiveDate>,
    ) -> Result<Vec<ShiftWithEmployee>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} {JOIN}
             WHERE s.company_id = $1
               AND s.employee_id = $2
               AND ($3::DATE IS NULL OR s.date >= $3)
             ORDER BY s.date, s.start_time, s.id"
        );
        sqlx::query_as::<_, ShiftWithEmployee>(&query)
            .bind(company_id)
            .bind(employee_id)
            .bind(from)
            .fetch_all(pool)
            .await
    }

    /// The employee's shifts on `date`, leaving out `exclude_id` when given.
    /// Input for overlap checks.
    pub async fn list_for_employee_on(
        pool: &PgPool,
        employee_id: DbId,
        date: NaiveDate,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<Shift>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shifts
             WHERE employee_id = $1
               AND date = $2
               AND ($3::BIGINT IS NULL OR id <> $3)
             ORDER BY start_time"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(employee_id)
            .bind(date)
            .bind(exclude_id)
            .fetch_all(pool)
            .await
    }

    /// All shifts of a company on `date`.
    pub async fn list_on_date(
        pool: &PgPool,
        company_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<Shift>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shifts
             WHERE company_id = $1 AND date = $2
             ORDER BY start_time, id"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(company_id)
            .bind(date)
            .fetch_all(pool)
            .await
    }
}
