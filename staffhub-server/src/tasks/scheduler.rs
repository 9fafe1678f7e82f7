//! 计划任务激活调度器
//!
//! 启动时补跑一次，之后每天在 `TASK_SWEEP_TIME` (按 `TIMEZONE`) 触发
//! [`TaskService::activate_scheduled_tasks`]。

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use tokio_util::sync::CancellationToken;

use super::{ActivationReport, TaskService};
use crate::utils::clock::SharedClock;

/// 计划任务激活调度器
///
/// 注册为 `TaskKind::Periodic`，在 `start_background_tasks()` 中启动。
#[derive(Clone)]
pub struct ScheduledTaskActivator {
    tasks: TaskService,
    clock: SharedClock,
    sweep_time: NaiveTime,
    tz: Tz,
    shutdown: CancellationToken,
}

impl ScheduledTaskActivator {
    pub fn new(
        tasks: TaskService,
        clock: SharedClock,
        sweep_time: NaiveTime,
        tz: Tz,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            tasks,
            clock,
            sweep_time,
            tz,
            shutdown,
        }
    }

    /// 主循环：每日定点触发，收到关机信号退出
    pub async fn run(self) {
        tracing::info!(
            sweep_time = %self.sweep_time.format("%H:%M"),
            timezone = %self.tz,
            "Scheduled task activator started"
        );

        loop {
            let now = DateTime::<Utc>::from_timestamp_millis(self.clock.now_millis())
                .unwrap_or_else(Utc::now);
            let sleep_duration = duration_until_next(self.sweep_time, self.tz, now);

            tracing::info!(
                "Next task activation in {} minutes",
                sleep_duration.as_secs() / 60
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {
                    self.sweep().await;
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Scheduled task activator received shutdown signal");
                    return;
                }
            }
        }
    }

    /// 执行一次激活并记录结果
    pub async fn sweep(&self) -> ActivationReport {
        let now = self.clock.now_millis();
        match self.tasks.activate_scheduled_tasks(now).await {
            Ok(report) => {
                if report.failed > 0 {
                    tracing::warn!(
                        activated = report.activated,
                        failed = report.failed,
                        "Task activation finished with failures"
                    );
                } else {
                    tracing::info!(
                        activated = report.activated,
                        failed = report.failed,
                        "Task activation finished"
                    );
                }
                report
            }
            Err(e) => {
                tracing::error!(error = %e, "Task activation sweep failed");
                ActivationReport::default()
            }
        }
    }
}

/// 距离下一次 `at` (时区 `tz`) 的时长
pub fn duration_until_next(at: NaiveTime, tz: Tz, now: DateTime<Utc>) -> std::time::Duration {
    let now = now.with_timezone(&tz);
    let today = now.date_naive();

    let target_date = if now.time() >= at {
        // 今天的时间点已过，等明天
        today + chrono::Duration::days(1)
    } else {
        today
    };

    let target_datetime = target_date
        .and_time(at)
        .and_local_timezone(tz)
        .earliest()
        .unwrap_or_else(|| {
            // DST gap: 该本地时间不存在，顺延一小时
            (target_date.and_time(at) + chrono::Duration::hours(1))
                .and_local_timezone(tz)
                .latest()
                .unwrap_or_else(|| {
                    tracing::error!("Cannot resolve local sweep time, using fallback");
                    now + chrono::Duration::hours(1)
                })
        });

    let duration = target_datetime.signed_duration_since(now);
    if duration.num_seconds() <= 0 {
        std::time::Duration::from_secs(60)
    } else {
        duration
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60))
    }
}
