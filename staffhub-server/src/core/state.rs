use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{Caller, CurrentUser, JwtService};
use crate::core::{BackgroundTasks, Config, ServerError, TaskKind};
use crate::db::DbService;
use crate::directory::DirectoryService;
use crate::shifts::ShiftService;
use crate::tasks::{ScheduledTaskActivator, TaskService};
use crate::utils::AppResult;
use crate::utils::clock::{SharedClock, system_clock};

/// 服务器状态 - 持有所有服务的引用
///
/// 所有字段都是可克隆的句柄，在 handler 与后台任务之间共享。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 服务器配置 |
/// | pool | SqlitePool | 数据库连接池 |
/// | jwt_service | Arc<JwtService> | JWT 令牌服务 |
/// | directory | DirectoryService | 员工目录 |
/// | tasks | TaskService | 任务引擎 |
/// | shifts | ShiftService | 班次引擎 |
/// | clock | SharedClock | 时间源 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub directory: DirectoryService,
    pub tasks: TaskService,
    pub shifts: ShiftService,
    pub clock: SharedClock,
}

impl ServerState {
    /// 打开数据库并组装服务
    ///
    /// 数据库无法打开时启动失败。
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        config
            .jwt
            .validate(config.is_development())
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_pool(config.clone(), db.pool, system_clock()))
    }

    /// 用现成的连接池和时钟组装 (测试使用内存库和手动时钟)
    pub fn with_pool(config: Config, pool: SqlitePool, clock: SharedClock) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let directory = DirectoryService::new(pool.clone(), jwt_service.clone(), clock.clone());
        let tasks = TaskService::new(pool.clone(), directory.clone(), clock.clone());
        let shifts = ShiftService::new(pool.clone(), directory.clone(), clock.clone());

        Self {
            config,
            pool,
            jwt_service,
            directory,
            tasks,
            shifts,
            clock,
        }
    }

    /// 令牌用户 -> 带公司信息的调用者
    pub async fn caller(&self, user: &CurrentUser) -> AppResult<Caller> {
        self.directory.resolve_caller(user).await
    }

    /// 启动后台任务: 补跑一次计划任务激活，然后每日定点激活
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let activator = ScheduledTaskActivator::new(
            self.tasks.clone(),
            self.clock.clone(),
            self.config.task_sweep_time,
            self.config.timezone,
            tasks.shutdown_token(),
        );

        let catch_up = activator.clone();
        tasks.spawn("task_activation_catch_up", TaskKind::Warmup, async move {
            catch_up.sweep().await;
        });
        tasks.spawn("task_activation", TaskKind::Periodic, activator.run());

        tasks.log_summary();
        tasks
    }
}
