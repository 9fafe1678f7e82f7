//! Auth API Module
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/auth/signup | POST | 注册公司管理员 | 无 |
//! | /api/auth/login | POST | 登录，返回令牌 | 无 |
//! | /api/auth/me | GET | 当前用户资料 | 需要 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/signup", post(handler::signup))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
}
