//! API 路由模块
//!
//! 每个资源一个子模块，`router()` 挂载到 `/api/<resource>`，
//! 处理函数在 `handler.rs`。

pub mod auth;
pub mod employees;
pub mod extract;
pub mod health;
pub mod shifts;
pub mod tasks;
