//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`ApiResponse`] (from shared::error)
//! - [`clock`] 可注入时钟
//! - [`logger`] 日志初始化
//! - [`validation`] 输入校验

pub mod clock;
pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
