//! Task Repository

use super::{RepoError, RepoResult, placeholders};
use shared::models::{Task, TaskStatus};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, title, description, assigned_to, assigned_by, due_date, scheduled_for, is_scheduled, status, started_at, completed_at, created_at, updated_at";

/// Row to insert; `status` / `is_scheduled` are decided by the caller
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_to: i64,
    pub assigned_by: i64,
    pub due_date: i64,
    pub scheduled_for: Option<i64>,
    pub is_scheduled: bool,
    pub status: TaskStatus,
}

/// Result of a status transition, written only if the stored status is
/// still `expected`
#[derive(Debug, Clone, Copy)]
pub struct StatusWrite {
    pub expected: TaskStatus,
    pub status: TaskStatus,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Task>> {
    let task = sqlx::query_as::<_, Task>(&format!("SELECT {COLUMNS} FROM task WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(task)
}

pub async fn create(pool: &SqlitePool, data: NewTask, now: i64) -> RepoResult<Task> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO task (id, title, description, assigned_to, assigned_by, due_date, scheduled_for, is_scheduled, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.assigned_to)
    .bind(data.assigned_by)
    .bind(data.due_date)
    .bind(data.scheduled_for)
    .bind(data.is_scheduled)
    .bind(data.status)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create task".into()))
}

/// Tasks assigned to any of `assignees`, newest first
pub async fn find_by_assignees(pool: &SqlitePool, assignees: &[i64]) -> RepoResult<Vec<Task>> {
    if assignees.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM task WHERE assigned_to IN ({}) ORDER BY created_at DESC, id DESC",
        placeholders(assignees.len())
    );
    let mut query = sqlx::query_as::<_, Task>(&sql);
    for id in assignees {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Tasks of one assignee restricted to `statuses`, newest first
pub async fn find_by_assignee_in_status(
    pool: &SqlitePool,
    assignee: i64,
    statuses: &[TaskStatus],
) -> RepoResult<Vec<Task>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM task WHERE assigned_to = ? AND status IN ({}) ORDER BY created_at DESC, id DESC",
        placeholders(statuses.len())
    );
    let mut query = sqlx::query_as::<_, Task>(&sql).bind(assignee);
    for status in statuses {
        query = query.bind(*status);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Compare-and-swap status write. Clears `is_scheduled`.
///
/// Returns `false` when the row is gone or its status no longer matches
/// `expected`.
pub async fn write_status(
    pool: &SqlitePool,
    id: i64,
    write: StatusWrite,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE task SET status = ?1, started_at = ?2, completed_at = ?3, is_scheduled = 0, updated_at = ?4 WHERE id = ?5 AND status = ?6",
    )
    .bind(write.status)
    .bind(write.started_at)
    .bind(write.completed_at)
    .bind(now)
    .bind(id)
    .bind(write.expected)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM task WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Ids of scheduled tasks whose activation time has passed
pub async fn find_due_scheduled(pool: &SqlitePool, now: i64) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM task WHERE is_scheduled = 1 AND status = 'pending' AND scheduled_for <= ? ORDER BY scheduled_for, id",
    )
    .bind(now)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// Flip one due task to `assigned`. `scheduled_for` is kept as history.
///
/// Returns `false` if the task was activated or modified in the meantime.
pub async fn activate(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE task SET is_scheduled = 0, status = 'assigned', updated_at = ?1 WHERE id = ?2 AND is_scheduled = 1 AND status = 'pending'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
