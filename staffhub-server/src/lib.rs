//! StaffHub Server - 员工管理后端
//!
//! # 架构概述
//!
//! - **员工目录** (`directory`): 公司管理员注册、登录、员工管理
//! - **任务引擎** (`tasks`): 指派、状态转换、每日计划任务激活
//! - **班次引擎** (`shifts`): 开始/结束班次、工作总结
//! - **认证授权** (`auth`): JWT + Argon2，声明式策略表
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! staffhub-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── auth/          # JWT 认证、授权策略
//! ├── db/            # SQLite 连接池与 repository
//! ├── directory/     # 员工目录
//! ├── tasks/         # 任务引擎与激活调度器
//! ├── shifts/        # 班次引擎
//! ├── services/      # HTTP 应用装配
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 时钟、日志、校验
//! ```

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod directory;
pub mod services;
pub mod shifts;
pub mod tasks;
pub mod utils;

// Re-export 公共类型
pub use auth::{Caller, CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use directory::DirectoryService;
pub use services::build_app;
pub use shifts::ShiftService;
pub use tasks::{ActivationReport, ScheduledTaskActivator, TaskService};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;
