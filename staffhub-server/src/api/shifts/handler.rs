//! Shift API Handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use shared::models::{Shift, ShiftEnd, ShiftWorkSummary};

use crate::api::extract::{AppJson, AppPath};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Shift>>> {
    let caller = state.caller(&user).await?;
    let shifts = state.shifts.list_shifts(&caller).await?;
    Ok(Json(shifts))
}

/// 当前未结束的班次 (没有则为 null)
pub async fn current(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Option<Shift>>> {
    let caller = state.caller(&user).await?;
    let shift = state.shifts.current_shift(&caller).await?;
    Ok(Json(shift))
}

pub async fn start(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<(StatusCode, Json<Shift>)> {
    let caller = state.caller(&user).await?;
    let shift = state.shifts.start_shift(&caller).await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

pub async fn end(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ShiftEnd>,
) -> AppResult<Json<Shift>> {
    let caller = state.caller(&user).await?;
    let shift = state.shifts.end_shift(&caller, id, payload).await?;
    Ok(Json(shift))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Shift>> {
    let caller = state.caller(&user).await?;
    let shift = state.shifts.get_shift_by_id(&caller, id).await?;
    Ok(Json(shift))
}

pub async fn update_work_summary(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ShiftWorkSummary>,
) -> AppResult<Json<Shift>> {
    let caller = state.caller(&user).await?;
    let shift = state
        .shifts
        .update_work_summary(&caller, id, payload)
        .await?;
    Ok(Json(shift))
}
