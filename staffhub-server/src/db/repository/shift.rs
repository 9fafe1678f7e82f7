//! Shift Repository

use super::{RepoError, RepoResult, placeholders};
use shared::models::Shift;
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, employee_id, start_time, end_time, work_summary, total_hours, created_at, updated_at";

/// Values written when a shift is closed
#[derive(Debug, Clone)]
pub struct ShiftClose {
    pub end_time: i64,
    pub work_summary: String,
    pub total_hours: f64,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Shift>> {
    let shift = sqlx::query_as::<_, Shift>(&format!("SELECT {COLUMNS} FROM shift WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(shift)
}

pub async fn find_open_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
) -> RepoResult<Option<Shift>> {
    let shift = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {COLUMNS} FROM shift WHERE employee_id = ? AND end_time IS NULL LIMIT 1"
    ))
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(shift)
}

/// Open a shift. A second open shift for the same employee violates
/// `uq_shift_open_per_employee` and surfaces as [`RepoError::Duplicate`].
pub async fn create(pool: &SqlitePool, employee_id: i64, now: i64) -> RepoResult<Shift> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO shift (id, employee_id, start_time, created_at, updated_at) VALUES (?1, ?2, ?3, ?3, ?3)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create shift".into()))
}

/// Shifts of any of `employees`, most recent first
pub async fn find_by_employees(pool: &SqlitePool, employees: &[i64]) -> RepoResult<Vec<Shift>> {
    if employees.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM shift WHERE employee_id IN ({}) ORDER BY start_time DESC, id DESC",
        placeholders(employees.len())
    );
    let mut query = sqlx::query_as::<_, Shift>(&sql);
    for id in employees {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Close an open shift. Returns `false` if it was already closed.
pub async fn close(pool: &SqlitePool, id: i64, data: ShiftClose, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE shift SET end_time = ?1, work_summary = ?2, total_hours = ?3, updated_at = ?4 WHERE id = ?5 AND end_time IS NULL",
    )
    .bind(data.end_time)
    .bind(&data.work_summary)
    .bind(data.total_hours)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Replace the summary of an open shift. Returns `false` if it is closed.
pub async fn update_summary(
    pool: &SqlitePool,
    id: i64,
    work_summary: &str,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE shift SET work_summary = ?1, updated_at = ?2 WHERE id = ?3 AND end_time IS NULL",
    )
    .bind(work_summary)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
