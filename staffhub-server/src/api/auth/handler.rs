//! Auth API Handlers

use axum::{Json, extract::State, http::StatusCode};
use shared::models::{Employee, LoginRequest, LoginResponse, SignupRequest};

use crate::api::extract::AppJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// 注册公司管理员
pub async fn signup(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let admin = state.directory.signup(payload).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

pub async fn login(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.directory.login(payload).await?;
    Ok(Json(response))
}

pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Employee>> {
    let employee = state.directory.me(&user).await?;
    Ok(Json(employee))
}
