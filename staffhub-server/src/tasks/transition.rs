//! 任务状态转换表
//!
//! | 当前 | 请求 | 结果 |
//! |------|------|------|
//! | assigned / pending | in-progress | 开始，首次写入 started_at |
//! | in-progress | in-progress | 无变化 |
//! | in-progress | completed | 完成，首次写入 completed_at |
//! | in-progress / completed | assigned / pending | 退回；离开 in-progress 时清空 started_at / completed_at |
//! | 其他 | | 拒绝 |

use std::fmt;

use shared::models::{Task, TaskStatus};

/// 一次合法转换的效果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// -> in-progress
    Start,
    /// in-progress -> in-progress
    NoOp,
    /// in-progress -> completed
    Complete,
    /// 退回 assigned / pending
    Reopen { to: TaskStatus, clear_timestamps: bool },
}

/// 不允许的转换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot change status from \"{}\" to \"{}\".",
            self.from, self.to
        )
    }
}

impl std::error::Error for InvalidTransition {}

/// 查表
pub fn plan(current: TaskStatus, requested: TaskStatus) -> Result<Effect, InvalidTransition> {
    use TaskStatus::*;

    match (current, requested) {
        (Assigned | Pending, InProgress) => Ok(Effect::Start),
        (InProgress, InProgress) => Ok(Effect::NoOp),
        (InProgress, Completed) => Ok(Effect::Complete),
        (InProgress | Completed, Assigned | Pending) => Ok(Effect::Reopen {
            to: requested,
            clear_timestamps: current == InProgress,
        }),
        _ => Err(InvalidTransition {
            from: current,
            to: requested,
        }),
    }
}

/// 应用效果后的 (status, started_at, completed_at)
///
/// `completed` 总是带着 `started_at`：从 in-progress 完成时开始时间已写入。
pub fn apply(task: &Task, effect: Effect, now: i64) -> (TaskStatus, Option<i64>, Option<i64>) {
    match effect {
        Effect::Start => (
            TaskStatus::InProgress,
            task.started_at.or(Some(now)),
            task.completed_at,
        ),
        Effect::NoOp => (task.status, task.started_at, task.completed_at),
        Effect::Complete => (
            TaskStatus::Completed,
            task.started_at.or(Some(now)),
            task.completed_at.or(Some(now)),
        ),
        Effect::Reopen {
            to,
            clear_timestamps: true,
        } => (to, None, None),
        Effect::Reopen { to, .. } => (to, task.started_at, task.completed_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TaskStatus::*;

    fn task(status: TaskStatus, started_at: Option<i64>, completed_at: Option<i64>) -> Task {
        Task {
            id: 1,
            title: "Stock count".into(),
            description: String::new(),
            assigned_to: 2,
            assigned_by: 1,
            due_date: 0,
            scheduled_for: None,
            is_scheduled: false,
            status,
            started_at,
            completed_at,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn full_table() {
        let all = [Pending, Assigned, InProgress, Completed];
        for from in all {
            for to in all {
                let result = plan(from, to);
                let allowed = matches!(
                    (from, to),
                    (Assigned | Pending, InProgress)
                        | (InProgress, InProgress | Completed)
                        | (InProgress | Completed, Assigned | Pending)
                );
                assert_eq!(result.is_ok(), allowed, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn assigned_cannot_jump_to_completed() {
        let err = plan(Assigned, Completed).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot change status from \"assigned\" to \"completed\"."
        );
        assert!(plan(Pending, Completed).is_err());
    }

    #[test]
    fn reopen_clears_timestamps_only_from_in_progress() {
        assert_eq!(
            plan(InProgress, Assigned),
            Ok(Effect::Reopen {
                to: Assigned,
                clear_timestamps: true
            })
        );
        assert_eq!(
            plan(Completed, Pending),
            Ok(Effect::Reopen {
                to: Pending,
                clear_timestamps: false
            })
        );
    }

    #[test]
    fn start_keeps_first_started_at() {
        let t = task(Assigned, Some(100), None);
        assert_eq!(apply(&t, Effect::Start, 500), (InProgress, Some(100), None));

        let t = task(Assigned, None, None);
        assert_eq!(apply(&t, Effect::Start, 500), (InProgress, Some(500), None));
    }

    #[test]
    fn complete_sets_both_timestamps() {
        let t = task(InProgress, Some(100), None);
        assert_eq!(
            apply(&t, Effect::Complete, 900),
            (Completed, Some(100), Some(900))
        );
    }

    #[test]
    fn reopen_from_in_progress_drops_timestamps() {
        // completed -> assigned -> in-progress leaves an old completed_at behind
        let t = task(InProgress, Some(100), Some(50));
        let effect = plan(InProgress, Assigned).unwrap();
        assert_eq!(apply(&t, effect, 900), (Assigned, None, None));
    }

    #[test]
    fn reopen_from_completed_keeps_history() {
        let t = task(Completed, Some(100), Some(200));
        let effect = plan(Completed, Assigned).unwrap();
        assert_eq!(apply(&t, effect, 900), (Assigned, Some(100), Some(200)));
    }
}
