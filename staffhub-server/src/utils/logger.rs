//! Logging Infrastructure
//!
//! Structured logging via `tracing`. Filter comes from `RUST_LOG` when set,
//! otherwise from the configured level.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// 业务日志之外还要保留的 target: 安全审计 (`security_log!`) 与访问日志
const AUDIT_TARGETS: [&str; 2] = ["security", "http_access"];

const DEFAULT_LEVEL: &str = "info";

/// 由日志级别构造过滤指令
fn filter_directives(level: &str) -> String {
    let mut directives = format!("staffhub_server={level},tower_http={level}");
    for target in AUDIT_TARGETS {
        // 审计日志不低于 info
        directives.push_str(&format!(",{target}={}", audit_level(level)));
    }
    directives
}

fn audit_level(level: &str) -> &str {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" => level,
        _ => DEFAULT_LEVEL,
    }
}

/// Initialize the logger with optional daily rolling file output
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let directives = filter_directives(log_level.unwrap_or(DEFAULT_LEVEL));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "staffhub-server");
            // a global subscriber may already be installed
            let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
            return;
        }
    }

    let _ = subscriber.try_init();
}
