//! Shift API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/shifts | GET | 班次列表 (管理员: 本公司; 员工: 自己) |
//! | /api/shifts/current | GET | 当前未结束班次 |
//! | /api/shifts/start | POST | 开始班次 (员工) |
//! | /api/shifts/end/{id} | PUT | 结束班次 (本人) |
//! | /api/shifts/{id} | GET | 班次详情 (本人或本公司管理员) |
//! | /api/shifts/{id}/work-summary | PUT | 更新工作总结 (本人) |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shifts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/current", get(handler::current))
        .route("/start", post(handler::start))
        .route("/end/{id}", put(handler::end))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/work-summary", put(handler::update_work_summary))
}
