//! 任务生命周期引擎
//!
//! 管理员指派任务 (可延期到 `scheduled_for` 生效)，被指派员工按
//! [`transition`] 表推进状态，计划任务由 [`scheduler`] 每日激活。

pub mod scheduler;
pub mod transition;

use std::collections::HashMap;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Employee, EmployeeSummary, Task, TaskAssign, TaskDetail, TaskStatus, TaskStatusUpdate,
};
use sqlx::SqlitePool;

use crate::auth::{Caller, Operation, Subject, authorize};
use crate::db::repository::task::{self, NewTask, StatusWrite};
use crate::directory::DirectoryService;
use crate::utils::clock::SharedClock;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_max_len, validate_required_text,
};

pub use scheduler::ScheduledTaskActivator;
pub use transition::{Effect, InvalidTransition};

/// 员工自己的任务列表可见的状态 (pending 在激活前隐藏)
const MY_TASK_STATUSES: [TaskStatus; 3] = [
    TaskStatus::Assigned,
    TaskStatus::InProgress,
    TaskStatus::Completed,
];

pub const MSG_STATUS_UPDATED: &str = "Task status updated successfully";
pub const MSG_ALREADY_IN_PROGRESS: &str = "Task is already in-progress";

/// 状态更新结果
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub task: Task,
    pub message: &'static str,
}

/// 一次激活扫描的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationReport {
    pub activated: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct TaskService {
    pool: SqlitePool,
    directory: DirectoryService,
    clock: SharedClock,
}

impl TaskService {
    pub fn new(pool: SqlitePool, directory: DirectoryService, clock: SharedClock) -> Self {
        Self {
            pool,
            directory,
            clock,
        }
    }

    /// 指派任务。`scheduled_for` 在未来时任务进入 pending 等待激活。
    pub async fn assign_task(&self, caller: &Caller, input: TaskAssign) -> AppResult<Task> {
        authorize(Operation::AssignTask, caller, Subject::None)?;

        validate_required_text(&input.title, "title", MAX_NAME_LEN)?;
        validate_max_len(&input.description, "description", MAX_DESCRIPTION_LEN)?;
        let assigned_to = input
            .assigned_to
            .ok_or_else(|| AppError::required_field("assigned_to"))?;
        let due_date = input
            .due_date
            .ok_or_else(|| AppError::required_field("due_date"))?;

        let assignee = self
            .directory
            .find(assigned_to)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::AssigneeNotFound))?;
        if assignee.company != caller.company {
            crate::security_log!(
                "WARN",
                "cross_company_assignment",
                caller_id = caller.id,
                assignee_id = assignee.id
            );
            return Err(AppError::cross_company("Cross-company assignment not allowed"));
        }

        let now = self.clock.now_millis();
        let is_scheduled = input.scheduled_for.is_some_and(|at| at > now);
        let status = if is_scheduled {
            TaskStatus::Pending
        } else {
            TaskStatus::Assigned
        };

        let created = task::create(
            &self.pool,
            NewTask {
                title: input.title.trim().to_string(),
                description: input.description,
                assigned_to,
                assigned_by: caller.id,
                due_date,
                scheduled_for: input.scheduled_for,
                is_scheduled,
                status,
            },
            now,
        )
        .await?;

        tracing::info!(
            task_id = created.id,
            assigned_to,
            assigned_by = caller.id,
            status = %created.status,
            "Task assigned"
        );
        Ok(created)
    }

    /// 管理员所在公司的全部任务，附带被指派人与指派人
    pub async fn list_tasks_for_admin(&self, caller: &Caller) -> AppResult<Vec<TaskDetail>> {
        authorize(Operation::ListCompanyTasks, caller, Subject::None)?;
        let members = self.directory.company_members(&caller.company).await?;
        let ids: Vec<i64> = members.iter().map(|e| e.id).collect();
        let tasks = task::find_by_assignees(&self.pool, &ids).await?;
        Ok(with_people(tasks, &members))
    }

    /// 指派给调用者的任务 (assigned / in-progress / completed)
    pub async fn list_tasks_for_employee(&self, caller: &Caller) -> AppResult<Vec<Task>> {
        authorize(Operation::ListMyTasks, caller, Subject::None)?;
        Ok(task::find_by_assignee_in_status(&self.pool, caller.id, &MY_TASK_STATUSES).await?)
    }

    /// 管理员查看同公司某员工的全部任务
    pub async fn list_tasks_for_employee_by_admin(
        &self,
        caller: &Caller,
        employee_id: i64,
    ) -> AppResult<Vec<TaskDetail>> {
        authorize(Operation::ListEmployeeTasks, caller, Subject::None)?;
        let target = self
            .directory
            .find(employee_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
        if target.company != caller.company {
            return Err(AppError::cross_company("Cross-company access not allowed"));
        }
        let tasks = task::find_by_assignees(&self.pool, &[target.id]).await?;
        let members = self.directory.company_members(&caller.company).await?;
        Ok(with_people(tasks, &members))
    }

    pub async fn get_task(&self, caller: &Caller, task_id: i64) -> AppResult<Task> {
        let found = self.load(task_id).await?;
        authorize(Operation::ViewTask, caller, assignee_of(&found))?;
        Ok(found)
    }

    /// 被指派员工推进任务状态
    pub async fn update_task_status(
        &self,
        caller: &Caller,
        task_id: i64,
        input: TaskStatusUpdate,
    ) -> AppResult<StatusChange> {
        let current = self.load(task_id).await?;
        authorize(Operation::UpdateTaskStatus, caller, assignee_of(&current))?;

        let requested = input
            .status
            .as_deref()
            .map(str::trim)
            .and_then(|s| s.parse::<TaskStatus>().ok())
            .ok_or_else(|| AppError::invalid_status(input.status.clone().unwrap_or_default()))?;

        let effect = transition::plan(current.status, requested)
            .map_err(|e| AppError::invalid_transition(e.from, e.to))?;

        if effect == Effect::NoOp {
            return Ok(StatusChange {
                task: current,
                message: MSG_ALREADY_IN_PROGRESS,
            });
        }

        let task = self.commit_status(&current, effect).await?;
        tracing::info!(
            task_id,
            from = %current.status,
            to = %task.status,
            "Task status updated"
        );
        Ok(StatusChange {
            task,
            message: MSG_STATUS_UPDATED,
        })
    }

    /// 只有创建任务的管理员可以删除
    pub async fn delete_task(&self, caller: &Caller, task_id: i64) -> AppResult<bool> {
        let found = self.load(task_id).await?;
        authorize(
            Operation::DeleteTask,
            caller,
            Subject::CreatedBy(found.assigned_by),
        )?;
        let deleted = task::delete(&self.pool, task_id).await?;
        if deleted {
            tracing::info!(task_id, deleted_by = caller.id, "Task deleted");
        }
        Ok(deleted)
    }

    /// 激活所有到期的计划任务
    ///
    /// 单个任务失败只记录日志并跳过；重复执行没有副作用。
    pub async fn activate_scheduled_tasks(&self, now: i64) -> AppResult<ActivationReport> {
        let due = task::find_due_scheduled(&self.pool, now).await?;
        let mut report = ActivationReport::default();

        for id in due {
            match task::activate(&self.pool, id, now).await {
                Ok(true) => report.activated += 1,
                Ok(false) => {
                    tracing::debug!(task_id = id, "Task no longer scheduled, skipped");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(task_id = id, error = %e, "Failed to activate scheduled task");
                }
            }
        }

        Ok(report)
    }

    /// 以读取时的状态为前提写入 (CAS)，期间被改动则返回 409
    async fn commit_status(&self, current: &Task, effect: Effect) -> AppResult<Task> {
        let now = self.clock.now_millis();
        let (status, started_at, completed_at) = transition::apply(current, effect, now);
        let written = task::write_status(
            &self.pool,
            current.id,
            StatusWrite {
                expected: current.status,
                status,
                started_at,
                completed_at,
            },
            now,
        )
        .await?;
        if !written {
            tracing::warn!(task_id = current.id, "Task status changed concurrently");
            return Err(AppError::concurrent_modification("task"));
        }
        self.load(current.id).await
    }

    async fn load(&self, task_id: i64) -> AppResult<Task> {
        task::find_by_id(&self.pool, task_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::TaskNotFound))
    }
}

/// 用公司成员名片补全任务两端的人
fn with_people(tasks: Vec<Task>, members: &[Employee]) -> Vec<TaskDetail> {
    let cards: HashMap<i64, EmployeeSummary> =
        members.iter().map(|e| (e.id, EmployeeSummary::from(e))).collect();
    tasks
        .into_iter()
        .map(|task| TaskDetail {
            assignee: cards.get(&task.assigned_to).cloned(),
            assigner: cards.get(&task.assigned_by).cloned(),
            task,
        })
        .collect()
}

fn assignee_of(task: &Task) -> Subject<'static> {
    Subject::OwnedBy {
        owner_id: task.assigned_to,
        owner_company: None,
    }
}
