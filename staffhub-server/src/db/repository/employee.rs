//! Employee Repository

use super::{RepoError, RepoResult};
use shared::models::{Employee, Role};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, username, email, hash_pass, designation, department, role, company, created_at, updated_at";

/// Row to insert; email is expected to be normalized already
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub username: String,
    pub email: String,
    pub hash_pass: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub role: Role,
    pub company: String,
}

/// Column patch; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub hash_pass: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let employee =
        sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employee WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(employee)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Employee>> {
    let employee =
        sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employee WHERE email = ?"))
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(employee)
}

pub async fn find_admin_by_company(
    pool: &SqlitePool,
    company: &str,
) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE company = ? AND role = 'admin' LIMIT 1"
    ))
    .bind(company)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

pub async fn find_by_company(pool: &SqlitePool, company: &str) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE company = ? ORDER BY created_at, id"
    ))
    .bind(company)
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Ids of every employee in a company (including the admin)
pub async fn member_ids(pool: &SqlitePool, company: &str) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM employee WHERE company = ?")
        .bind(company)
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

pub async fn create(pool: &SqlitePool, data: NewEmployee, now: i64) -> RepoResult<Employee> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO employee (id, username, email, hash_pass, designation, department, role, company, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&data.email)
    .bind(&data.hash_pass)
    .bind(&data.designation)
    .bind(&data.department)
    .bind(data.role)
    .bind(&data.company)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: EmployeePatch,
    now: i64,
) -> RepoResult<Employee> {
    let rows = sqlx::query(
        "UPDATE employee SET username = COALESCE(?1, username), email = COALESCE(?2, email), hash_pass = COALESCE(?3, hash_pass), designation = COALESCE(?4, designation), department = COALESCE(?5, department), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.username)
    .bind(&data.email)
    .bind(&data.hash_pass)
    .bind(&data.designation)
    .bind(&data.department)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Hard delete; tasks and shifts referencing the employee cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
