//! Task API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/tasks/assign | POST | 指派任务 (管理员) |
//! | /api/tasks | GET | 本公司全部任务 (管理员) |
//! | /api/tasks/my | GET | 我的任务 |
//! | /api/tasks/employee/{id} | GET | 某员工的任务 (管理员) |
//! | /api/tasks/{id} | GET / DELETE | 查看 (被指派人) / 删除 (创建者) |
//! | /api/tasks/update/{id} | PUT | 更新状态 (被指派人) |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tasks", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/assign", post(handler::assign))
        .route("/my", get(handler::my_tasks))
        .route("/employee/{id}", get(handler::list_for_employee))
        .route("/update/{id}", put(handler::update_status))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
}
