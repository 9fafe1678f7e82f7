use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时会先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | ./data/staffhub.db | SQLite 数据库文件 |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TASK_SWEEP_TIME | 00:00 | 计划任务激活时间 (HH:MM) |
/// | TIMEZONE | UTC | 激活时间所在时区 (IANA) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录，设置后按天滚动写文件 |
/// | JWT_SECRET / JWT_EXPIRATION_MINUTES / JWT_ISSUER / JWT_AUDIENCE | 见 [`JwtConfig`] | JWT 配置 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 TASK_SWEEP_TIME=06:30 TIMEZONE=Europe/Madrid cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 每日计划任务激活时间点
    pub task_sweep_time: NaiveTime,
    /// 激活时间所在时区
    pub timezone: Tz,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/staffhub.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            task_sweep_time: std::env::var("TASK_SWEEP_TIME")
                .ok()
                .map(|s| parse_sweep_time(&s))
                .unwrap_or(NaiveTime::MIN),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| match tz.parse::<Tz>() {
                    Ok(tz) => Some(tz),
                    Err(_) => {
                        tracing::warn!(timezone = %tz, "Unknown TIMEZONE, falling back to UTC");
                        None
                    }
                })
                .unwrap_or(Tz::UTC),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 解析 `HH:MM`，非法值回退到 00:00
pub fn parse_sweep_time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").unwrap_or_else(|_| {
        tracing::warn!(value = %value, "Invalid TASK_SWEEP_TIME, using 00:00");
        NaiveTime::MIN
    })
}
