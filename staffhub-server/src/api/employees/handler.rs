//! Employee API Handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};

use crate::api::extract::{AppJson, AppPath};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// List employees of the caller's company
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Employee>>> {
    let caller = state.caller(&user).await?;
    let employees = state.directory.list_employees(&caller).await?;
    Ok(Json(employees))
}

/// Get employee by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Employee>> {
    let caller = state.caller(&user).await?;
    let employee = state.directory.get_employee(&caller, id).await?;
    Ok(Json(employee))
}

/// Create a new employee in the caller's company
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<EmployeeCreate>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let caller = state.caller(&user).await?;
    let employee = state.directory.create_employee(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Update an employee
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    let caller = state.caller(&user).await?;
    let employee = state.directory.update_employee(&caller, id, payload).await?;
    Ok(Json(employee))
}

/// Delete an employee (tasks and shifts cascade)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<bool>> {
    let caller = state.caller(&user).await?;
    let deleted = state.directory.delete_employee(&caller, id).await?;
    Ok(Json(deleted))
}
