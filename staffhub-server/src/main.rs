use staffhub_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载 .env
    let _ = dotenv::dotenv();

    // 2. 日志
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    // 3. 加载配置
    let config = Config::from_env();
    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "StaffHub server starting"
    );

    // 4. 初始化服务器状态 (数据库无法打开时直接退出)
    let state = ServerState::initialize(&config).await?;

    // 5. 启动 HTTP 服务器和后台任务
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
