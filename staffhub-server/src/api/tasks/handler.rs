//! Task API Handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use shared::models::{Task, TaskAssign, TaskDetail, TaskStatusUpdate};

use crate::api::extract::{AppJson, AppPath};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

pub async fn assign(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<TaskAssign>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let caller = state.caller(&user).await?;
    let task = state.tasks.assign_task(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// 本公司全部任务
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<TaskDetail>>> {
    let caller = state.caller(&user).await?;
    let tasks = state.tasks.list_tasks_for_admin(&caller).await?;
    Ok(Json(tasks))
}

pub async fn my_tasks(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Task>>> {
    let caller = state.caller(&user).await?;
    let tasks = state.tasks.list_tasks_for_employee(&caller).await?;
    Ok(Json(tasks))
}

pub async fn list_for_employee(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(employee_id): AppPath<i64>,
) -> AppResult<Json<Vec<TaskDetail>>> {
    let caller = state.caller(&user).await?;
    let tasks = state
        .tasks
        .list_tasks_for_employee_by_admin(&caller, employee_id)
        .await?;
    Ok(Json(tasks))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Task>> {
    let caller = state.caller(&user).await?;
    let task = state.tasks.get_task(&caller, id).await?;
    Ok(Json(task))
}

/// 更新状态，返回 `{message, data}`
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<TaskStatusUpdate>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let caller = state.caller(&user).await?;
    let change = state.tasks.update_task_status(&caller, id, payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        change.message,
        change.task,
    )))
}

pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<bool>> {
    let caller = state.caller(&user).await?;
    let deleted = state.tasks.delete_task(&caller, id).await?;
    Ok(Json(deleted))
}
