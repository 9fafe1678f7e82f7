//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`policy`] - 操作级授权策略表
//! - [`password`] - Argon2 密码哈希

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use policy::{Caller, Capability, Operation, Subject, authorize};
