use thiserror::Error;

/// 服务器生命周期错误 (启动、监听、关闭)
///
/// 请求级错误统一使用 [`shared::error::AppError`]。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("监听失败: {0}")]
    Bind(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

impl From<shared::error::AppError> for ServerError {
    fn from(err: shared::error::AppError) -> Self {
        match err.code {
            shared::error::ErrorCode::DatabaseError => ServerError::Database(err.message),
            shared::error::ErrorCode::ConfigError => ServerError::Config(err.message),
            _ => ServerError::Internal(anyhow::anyhow!(err.message)),
        }
    }
}

/// 服务器生命周期 Result
pub type Result<T> = std::result::Result<T, ServerError>;
